use kurbo::{Affine, Cap, Line, Point, Rect, Size, Stroke};
use parley::FontWeight;
use peniko::Brush;

mod annotation;
mod bounds;
mod error;
mod layer;
mod legend;
mod model;
mod regression;
mod render;
mod theme;

pub use annotation::{Annotation, TextBox};
pub use bounds::{Bounds, NiceTicksIter, Range};
pub use error::{PlotError, Result};
pub use layer::{
  BandLayer, BandOptions, Layer, LineLayer, LineOptions, ScatterLayer, ScatterOptions,
};
pub use legend::{LegendEntry, LegendMarker};
pub use model::{Coefficients, LinearFit, PredictionInterval};
pub use regression::{
  CONFIDENCE_BAND_LABEL, DEFAULT_SAMPLES, REGRESSION_LINE_LABEL, RegressionPlot, format_annotation,
  plot_regression,
};
pub use render::{Align, DrawText, Render};
pub use theme::Theme;

/// A single set of axes with its layers and decorations.
///
/// Figures are plain values: building one never touches a GPU or a window.
/// Output happens through [`Figure::to_scene`], [`Figure::save`] or
/// [`Figure::show`].
#[derive(Debug, Clone, Default)]
pub struct Figure {
  pub(crate) theme: Theme,

  title:   Option<String>,
  x_label: Option<String>,
  y_label: Option<String>,

  pub(crate) layers:      Vec<Layer>,
  pub(crate) annotations: Vec<Annotation>,

  legend:       bool,
  grid:         bool,
  tight_layout: bool,
}

const TICK_LENGTH: f64 = 6.0;
const TICK_GAP: f64 = 4.0;
const PADDING: f64 = 12.0;
const FIXED_MARGIN: f64 = 80.0;
const TICK_COUNT: u32 = 10;

impl Figure {
  pub fn new() -> Figure { Figure::default() }

  pub fn with_theme(theme: Theme) -> Figure { Figure { theme, ..Default::default() } }

  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = Some(title.to_string());
    self
  }

  pub fn x_label(&mut self, label: &str) -> &mut Self {
    self.x_label = Some(label.to_string());
    self
  }

  pub fn y_label(&mut self, label: &str) -> &mut Self {
    self.y_label = Some(label.to_string());
    self
  }

  pub fn legend(&mut self, enabled: bool) -> &mut Self {
    self.legend = enabled;
    self
  }

  pub fn grid(&mut self, enabled: bool) -> &mut Self {
    self.grid = enabled;
    self
  }

  /// Fit margins to the measured title, labels and tick labels instead of
  /// using a fixed inset.
  pub fn tight_layout(&mut self, enabled: bool) -> &mut Self {
    self.tight_layout = enabled;
    self
  }

  pub fn theme(&self) -> &Theme { &self.theme }
  pub fn get_title(&self) -> Option<&str> { self.title.as_deref() }
  pub fn get_x_label(&self) -> Option<&str> { self.x_label.as_deref() }
  pub fn get_y_label(&self) -> Option<&str> { self.y_label.as_deref() }
  pub fn layers(&self) -> &[Layer] { &self.layers }
  pub fn annotations(&self) -> &[Annotation] { &self.annotations }
  pub fn has_legend(&self) -> bool { self.legend }
  pub fn has_grid(&self) -> bool { self.grid }
  pub fn is_tight_layout(&self) -> bool { self.tight_layout }

  /// Size in inches.
  pub fn size(&self) -> Size { self.theme.figure_size }

  /// Union of every layer's data, with a 5% margin on each side.
  pub fn data_bounds(&self) -> Bounds {
    self
      .layers
      .iter()
      .filter_map(Layer::data_bounds)
      .reduce(|a, b| a.union(b))
      .unwrap_or(Bounds::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)))
      .non_degenerate()
      .expand_by(0.05)
  }

  /// The plot area in canvas pixels. The y range is flipped: `min` is the
  /// bottom edge and `max` the top.
  pub fn viewport(&self, render: &mut Render, canvas: Size) -> Bounds {
    let (left, right, top, bottom) = if self.tight_layout {
      self.tight_margins(render)
    } else {
      (FIXED_MARGIN, FIXED_MARGIN, FIXED_MARGIN, FIXED_MARGIN)
    };

    let x_min = left.min(canvas.width - 1.0);
    let y_max = top.min(canvas.height - 1.0);
    Bounds::new(
      Range::new(x_min, (canvas.width - right).max(x_min + 1.0)),
      Range::new((canvas.height - bottom).max(y_max + 1.0), y_max),
    )
  }

  fn tight_margins(&self, render: &mut Render) -> (f64, f64, f64, f64) {
    let data_bounds = self.data_bounds();

    let mut y_tick_width = 0.0_f64;
    for label in tick_labels(data_bounds.y) {
      y_tick_width = y_tick_width.max(render.text_size(&self.tick_text(&label)).width);
    }
    let mut x_tick = Size::ZERO;
    for label in tick_labels(data_bounds.x) {
      let size = render.text_size(&self.tick_text(&label));
      x_tick = Size::new(x_tick.width.max(size.width), x_tick.height.max(size.height));
    }

    let title_height = match &self.title {
      Some(title) => render.text_size(&self.title_text(title)).height + PADDING,
      None => 0.0,
    };
    let x_label_height = match &self.x_label {
      Some(label) => render.text_size(&self.label_text(label)).height + PADDING / 2.0,
      None => 0.0,
    };
    // Rotated, so its height is horizontal extent.
    let y_label_width = match &self.y_label {
      Some(label) => render.text_size(&self.label_text(label)).height + PADDING / 2.0,
      None => 0.0,
    };

    let left = PADDING + y_label_width + y_tick_width + TICK_LENGTH + TICK_GAP;
    let right = PADDING + x_tick.width / 2.0;
    let top = PADDING + title_height;
    let bottom = PADDING + x_label_height + x_tick.height + TICK_LENGTH + TICK_GAP;
    (left, right, top, bottom)
  }

  fn tick_text<'a>(&self, label: &'a str) -> DrawText<'a> {
    DrawText {
      text: label,
      size: self.theme.tick_size,
      brush: Brush::Solid(self.theme.text),
      ..Default::default()
    }
  }

  fn label_text<'a>(&self, label: &'a str) -> DrawText<'a> {
    DrawText {
      text: label,
      size: self.theme.label_size,
      brush: Brush::Solid(self.theme.text),
      ..Default::default()
    }
  }

  fn title_text<'a>(&self, title: &'a str) -> DrawText<'a> {
    DrawText {
      text: title,
      size: self.theme.title_size,
      weight: FontWeight::BOLD,
      brush: Brush::Solid(self.theme.text),
      ..Default::default()
    }
  }

  /// Paints the whole figure onto a `canvas` sized area of `render`.
  pub fn draw(&self, render: &mut Render, canvas: Size) {
    let background = Rect::from_origin_size(Point::ZERO, canvas);
    render.fill(&background, Affine::IDENTITY, self.theme.background);

    let viewport = self.viewport(render, canvas);
    let data_bounds = self.data_bounds();
    let transform = data_bounds.transform_to(viewport);

    let x_ticks = ticks(data_bounds.x);
    let y_ticks = ticks(data_bounds.y);

    if self.grid {
      let grid_stroke = Stroke::new(1.0);
      let grid_color = self.theme.grid_color();
      for (x, _) in &x_ticks {
        let vx = (transform * Point::new(*x, 0.0)).x;
        render.stroke(
          &Line::new((vx, viewport.y.min), (vx, viewport.y.max)),
          Affine::IDENTITY,
          grid_color,
          &grid_stroke,
        );
      }
      for (y, _) in &y_ticks {
        let vy = (transform * Point::new(0.0, *y)).y;
        render.stroke(
          &Line::new((viewport.x.min, vy), (viewport.x.max, vy)),
          Affine::IDENTITY,
          grid_color,
          &grid_stroke,
        );
      }
    }

    for layer in &self.layers {
      layer.draw(render, transform);
    }

    self.draw_axes(render, viewport, transform, &x_ticks, &y_ticks);

    self.draw_annotations(render, viewport);
    if self.legend {
      self.draw_legend(render, viewport);
    }
  }

  fn draw_axes(
    &self,
    render: &mut Render,
    viewport: Bounds,
    transform: Affine,
    x_ticks: &[(f64, String)],
    y_ticks: &[(f64, String)],
  ) {
    let spine_stroke = Stroke::new(1.5);
    let frame = Rect::new(viewport.x.min, viewport.y.max, viewport.x.max, viewport.y.min);
    render.stroke(&frame, Affine::IDENTITY, self.theme.spine, &spine_stroke);

    let tick_stroke = spine_stroke.clone().with_start_cap(Cap::Butt);
    let mut y_tick_width = 0.0_f64;
    for (y, label) in y_ticks {
      let vy = (transform * Point::new(0.0, *y)).y;
      render.stroke(
        &Line::new((viewport.x.min, vy), (viewport.x.min - TICK_LENGTH, vy)),
        Affine::IDENTITY,
        self.theme.spine,
        &tick_stroke,
      );
      let mut text = self.tick_text(label);
      text.position = Point::new(viewport.x.min - TICK_LENGTH - TICK_GAP, vy);
      text.horizontal_align = Align::End;
      text.vertical_align = Align::Center;
      y_tick_width = y_tick_width.max(render.text_size(&text).width);
      render.draw_text(text);
    }

    let mut x_tick_height = 0.0_f64;
    for (x, label) in x_ticks {
      let vx = (transform * Point::new(*x, 0.0)).x;
      render.stroke(
        &Line::new((vx, viewport.y.min), (vx, viewport.y.min + TICK_LENGTH)),
        Affine::IDENTITY,
        self.theme.spine,
        &tick_stroke,
      );
      let mut text = self.tick_text(label);
      text.position = Point::new(vx, viewport.y.min + TICK_LENGTH + TICK_GAP);
      text.horizontal_align = Align::Center;
      x_tick_height = x_tick_height.max(render.text_size(&text).height);
      render.draw_text(text);
    }

    let center_x = (viewport.x.min + viewport.x.max) / 2.0;
    let center_y = (viewport.y.min + viewport.y.max) / 2.0;

    if let Some(title) = &self.title {
      let mut text = self.title_text(title);
      text.position = Point::new(center_x, viewport.y.max - PADDING / 2.0);
      text.horizontal_align = Align::Center;
      text.vertical_align = Align::End;
      render.draw_text(text);
    }

    if let Some(x_label) = &self.x_label {
      let mut text = self.label_text(x_label);
      let y = viewport.y.min + TICK_LENGTH + TICK_GAP + x_tick_height + PADDING / 2.0;
      text.position = Point::new(center_x, y);
      text.horizontal_align = Align::Center;
      render.draw_text(text);
    }

    if let Some(y_label) = &self.y_label {
      let mut text = self.label_text(y_label);
      let x = viewport.x.min - TICK_LENGTH - TICK_GAP - y_tick_width - PADDING / 2.0;
      text.position = Point::new(x, center_y);
      text.transform = Affine::rotate(-std::f64::consts::FRAC_PI_2);
      text.horizontal_align = Align::Center;
      text.vertical_align = Align::End;
      render.draw_text(text);
    }
  }
}

/// Tick positions inside `range`, paired with their printed labels.
fn ticks(range: Range) -> Vec<(f64, String)> {
  let iter = range.nice_ticks(TICK_COUNT);
  let precision = iter.label_precision();
  iter.filter(|v| range.contains(v)).map(|v| (v, format!("{v:.precision$}"))).collect()
}

fn tick_labels(range: Range) -> impl Iterator<Item = String> {
  ticks(range).into_iter().map(|(_, label)| label)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn figure() -> Figure {
    let mut figure = Figure::new();
    figure.title("Demo").x_label("x").y_label("y");
    figure.scatter(vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 5.0]);
    figure
  }

  #[test]
  fn data_bounds_have_margin() {
    let bounds = figure().data_bounds();
    assert!((bounds.x.min - 0.9).abs() < 1e-9);
    assert!((bounds.x.max - 3.1).abs() < 1e-9);
    assert!((bounds.y.min - 1.85).abs() < 1e-9);
    assert!((bounds.y.max - 5.15).abs() < 1e-9);
  }

  #[test]
  fn flat_data_still_has_extent() {
    let mut figure = Figure::new();
    figure.scatter(vec![1.0, 2.0], vec![3.0, 3.0]);
    assert!(figure.data_bounds().y.size() > 0.0);
  }

  #[test]
  fn empty_figure_bounds() {
    let bounds = Figure::new().data_bounds();
    assert!(bounds.x.size() > 0.0 && bounds.y.size() > 0.0);
  }

  #[test]
  fn fixed_viewport() {
    let mut render = Render::new(peniko::Color::WHITE);
    let viewport = figure().viewport(&mut render, Size::new(1000.0, 600.0));
    assert_eq!(viewport.x, Range::new(80.0, 920.0));
    assert_eq!(viewport.y, Range::new(520.0, 80.0));
  }

  #[test]
  fn tight_viewport_stays_on_canvas() {
    let mut figure = figure();
    figure.tight_layout(true);
    let mut render = Render::new(peniko::Color::WHITE);
    let viewport = figure.viewport(&mut render, Size::new(1000.0, 600.0));
    assert!(viewport.x.min >= PADDING && viewport.x.max <= 1000.0);
    assert!(viewport.y.max >= PADDING && viewport.y.min <= 600.0);
    assert!(viewport.x.min < viewport.x.max);
    assert!(viewport.y.max < viewport.y.min);
  }

  #[test]
  fn ticks_inside_range() {
    let range = Range::new(0.8, 5.2);
    let ticks = ticks(range);
    assert!(!ticks.is_empty());
    assert!(ticks.iter().all(|(v, _)| range.contains(v)));
    assert!(ticks.iter().any(|(_, label)| label == "1.00"));
  }
}
