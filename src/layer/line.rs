use kurbo::{Affine, BezPath, Point, Stroke};
use peniko::Color;

use crate::{Bounds, Range, render::Render};

#[derive(Debug, Clone)]
pub struct LineLayer {
  x:                  Vec<f64>,
  y:                  Vec<f64>,
  pub(crate) options: LineOptions,
  pub(crate) label:   Option<String>,
}

#[derive(Debug, Clone)]
pub struct LineOptions {
  pub width: f64,
  pub color: Color,
  pub dash:  Option<Vec<f64>>,
}

impl Default for LineOptions {
  fn default() -> Self {
    LineOptions { width: 2.0, color: Color::from_rgb8(117, 158, 208), dash: None }
  }
}

impl LineLayer {
  pub(crate) fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
    LineLayer { x, y, options: LineOptions::default(), label: None }
  }

  pub fn width(&mut self, width: f64) -> &mut Self {
    self.options.width = width;
    self
  }

  pub fn color(&mut self, color: Color) -> &mut Self {
    self.options.color = color;
    self
  }

  pub fn dash(&mut self, dash: Vec<f64>) -> &mut Self {
    self.options.dash = Some(dash);
    self
  }

  pub fn label(&mut self, label: &str) -> &mut Self {
    self.label = Some(label.to_string());
    self
  }

  pub fn options(&self) -> &LineOptions { &self.options }

  pub fn x(&self) -> &[f64] { &self.x }
  pub fn y(&self) -> &[f64] { &self.y }

  fn iter(&self) -> impl Iterator<Item = Point> + '_ {
    self.x.iter().zip(&self.y).map(|(&x, &y)| Point::new(x, y))
  }

  pub(crate) fn data_bounds(&self) -> Option<Bounds> {
    let x = Range::from_values(self.x.iter().copied())?;
    let y = Range::from_values(self.y.iter().copied())?;
    Some(Bounds::new(x, y))
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    let mut shape = BezPath::new();

    for (i, point) in self.iter().map(|p| transform * p).enumerate() {
      if i == 0 {
        shape.move_to(point);
      } else {
        shape.line_to(point);
      }
    }

    let mut stroke = Stroke::new(self.options.width);
    if let Some(dash) = &self.options.dash {
      stroke = stroke.with_dashes(0.0, dash.clone());
    }

    render.stroke(&shape, Affine::IDENTITY, self.options.color, &stroke);
  }
}
