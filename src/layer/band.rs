use kurbo::{Affine, BezPath, Point};
use peniko::Color;

use crate::{Bounds, Range, render::Render};

/// A filled region between two curves sharing the same x values.
#[derive(Debug, Clone)]
pub struct BandLayer {
  x:                  Vec<f64>,
  lower:              Vec<f64>,
  upper:              Vec<f64>,
  pub(crate) options: BandOptions,
  pub(crate) label:   Option<String>,
}

#[derive(Debug, Clone)]
pub struct BandOptions {
  pub color: Color,
}

impl Default for BandOptions {
  fn default() -> Self { BandOptions { color: Color::from_rgba8(117, 158, 208, 64) } }
}

impl BandLayer {
  pub(crate) fn new(x: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Self {
    BandLayer { x, lower, upper, options: BandOptions::default(), label: None }
  }

  pub fn color(&mut self, color: Color) -> &mut Self {
    self.options.color = color;
    self
  }

  pub fn label(&mut self, label: &str) -> &mut Self {
    self.label = Some(label.to_string());
    self
  }

  pub fn options(&self) -> &BandOptions { &self.options }

  pub fn x(&self) -> &[f64] { &self.x }
  pub fn lower(&self) -> &[f64] { &self.lower }
  pub fn upper(&self) -> &[f64] { &self.upper }

  pub(crate) fn data_bounds(&self) -> Option<Bounds> {
    let y = Range::from_values(self.lower.iter().chain(&self.upper).copied())?;
    Some(Bounds::new(Range::from_values(self.x.iter().copied())?, y))
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    let mut shape = BezPath::new();

    // Forward along the upper curve, back along the lower one.
    let upper = self.x.iter().zip(&self.upper);
    let lower = self.x.iter().zip(&self.lower).rev();
    for (i, (&x, &y)) in upper.chain(lower).enumerate() {
      let point = transform * Point::new(x, y);
      if i == 0 {
        shape.move_to(point);
      } else {
        shape.line_to(point);
      }
    }
    shape.close_path();

    render.fill(&shape, Affine::IDENTITY, self.options.color);
  }
}
