use kurbo::{Affine, Circle, Point};
use peniko::Color;

use crate::{Bounds, Range, render::Render};

#[derive(Debug, Clone)]
pub struct ScatterLayer {
  x:                  Vec<f64>,
  y:                  Vec<f64>,
  pub(crate) options: ScatterOptions,
  pub(crate) label:   Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScatterOptions {
  pub size:  f64,
  pub color: Color,
}

impl Default for ScatterOptions {
  fn default() -> Self { ScatterOptions { size: 5.0, color: Color::from_rgb8(117, 158, 208) } }
}

impl ScatterLayer {
  pub(crate) fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
    ScatterLayer { x, y, options: ScatterOptions::default(), label: None }
  }

  pub fn size(&mut self, size: f64) -> &mut Self {
    self.options.size = size;
    self
  }

  pub fn color(&mut self, color: Color) -> &mut Self {
    self.options.color = color;
    self
  }

  pub fn label(&mut self, label: &str) -> &mut Self {
    self.label = Some(label.to_string());
    self
  }

  pub fn options(&self) -> &ScatterOptions { &self.options }

  pub fn len(&self) -> usize { self.x.len().min(self.y.len()) }
  pub fn is_empty(&self) -> bool { self.len() == 0 }

  pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
    self.x.iter().zip(&self.y).map(|(&x, &y)| Point::new(x, y))
  }

  pub(crate) fn data_bounds(&self) -> Option<Bounds> {
    let x = Range::from_values(self.x.iter().copied())?;
    let y = Range::from_values(self.y.iter().copied())?;
    Some(Bounds::new(x, y))
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    for point in self.points().map(|p| transform * p) {
      render.fill(&Circle::new(point, self.options.size), Affine::IDENTITY, self.options.color);
    }
  }
}
