use color::{OpaqueColor, Srgb};
use kurbo::Size;
use peniko::Color;

/// Visual configuration of a figure. Sizes of text and marks are in pixels
/// at the theme's dpi.
#[derive(Debug, Clone)]
pub struct Theme {
  /// Figure size in inches.
  pub figure_size: Size,
  pub dpi:         f64,

  pub background: Color,
  pub text:       Color,
  pub spine:      Color,

  pub scatter:       OpaqueColor<Srgb>,
  pub scatter_alpha: f32,
  pub point_radius:  f64,

  pub regression: OpaqueColor<Srgb>,
  pub line_width: f64,
  pub band_alpha: f32,

  pub grid_alpha:           f32,
  pub annotation_box_alpha: f32,

  pub title_size:      f32,
  pub label_size:      f32,
  pub tick_size:       f32,
  pub annotation_size: f32,
  pub legend_size:     f32,
}

impl Default for Theme {
  fn default() -> Self {
    Theme {
      figure_size: Size::new(10.0, 6.0),
      dpi:         100.0,

      background: Color::WHITE,
      text:       Color::from_rgb8(32, 32, 32),
      spine:      Color::from_rgb8(128, 128, 128),

      scatter:       OpaqueColor::new([0.122, 0.467, 0.706]),
      scatter_alpha: 0.5,
      point_radius:  4.0,

      regression: OpaqueColor::new([1.0, 0.0, 0.0]),
      line_width: 2.0,
      band_alpha: 0.1,

      grid_alpha:           0.3,
      annotation_box_alpha: 0.8,

      title_size:      20.0,
      label_size:      16.0,
      tick_size:       13.0,
      annotation_size: 15.0,
      legend_size:     14.0,
    }
  }
}

impl Theme {
  /// Canvas size in pixels.
  pub fn pixel_size(&self) -> Size { self.figure_size * self.dpi }

  pub fn scatter_color(&self) -> Color { self.scatter.with_alpha(self.scatter_alpha) }
  pub fn line_color(&self) -> Color { self.regression.with_alpha(1.0) }
  pub fn band_color(&self) -> Color { self.regression.with_alpha(self.band_alpha) }
  pub fn grid_color(&self) -> Color { self.spine.with_alpha(self.grid_alpha) }
  pub fn annotation_box_color(&self) -> Color { Color::WHITE.with_alpha(self.annotation_box_alpha) }
}
