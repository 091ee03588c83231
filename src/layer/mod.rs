mod band;
mod line;
mod scatter;

pub use band::{BandLayer, BandOptions};
pub use line::{LineLayer, LineOptions};
pub use scatter::{ScatterLayer, ScatterOptions};

use kurbo::Affine;
use peniko::Color;

use crate::{Bounds, Figure, render::Render};

/// One drawable series of a figure, painted in insertion order.
#[derive(Debug, Clone)]
pub enum Layer {
  Scatter(ScatterLayer),
  Line(LineLayer),
  Band(BandLayer),
}

impl Layer {
  pub fn label(&self) -> Option<&str> {
    match self {
      Layer::Scatter(l) => l.label.as_deref(),
      Layer::Line(l) => l.label.as_deref(),
      Layer::Band(l) => l.label.as_deref(),
    }
  }

  pub(crate) fn color(&self) -> Color {
    match self {
      Layer::Scatter(l) => l.options.color,
      Layer::Line(l) => l.options.color,
      Layer::Band(l) => l.options.color,
    }
  }

  pub(crate) fn data_bounds(&self) -> Option<Bounds> {
    match self {
      Layer::Scatter(l) => l.data_bounds(),
      Layer::Line(l) => l.data_bounds(),
      Layer::Band(l) => l.data_bounds(),
    }
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    match self {
      Layer::Scatter(l) => l.draw(render, transform),
      Layer::Line(l) => l.draw(render, transform),
      Layer::Band(l) => l.draw(render, transform),
    }
  }
}

impl Figure {
  pub fn scatter(&mut self, x: Vec<f64>, y: Vec<f64>) -> &mut ScatterLayer {
    self.layers.push(Layer::Scatter(ScatterLayer::new(x, y)));
    match self.layers.last_mut() {
      Some(Layer::Scatter(l)) => l,
      _ => unreachable!(),
    }
  }

  pub fn line(&mut self, x: Vec<f64>, y: Vec<f64>) -> &mut LineLayer {
    self.layers.push(Layer::Line(LineLayer::new(x, y)));
    match self.layers.last_mut() {
      Some(Layer::Line(l)) => l,
      _ => unreachable!(),
    }
  }

  pub fn fill_between(&mut self, x: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> &mut BandLayer {
    self.layers.push(Layer::Band(BandLayer::new(x, lower, upper)));
    match self.layers.last_mut() {
      Some(Layer::Band(l)) => l,
      _ => unreachable!(),
    }
  }
}
