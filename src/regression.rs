//! Scatter plot of two columns with a fitted regression line, its confidence
//! band, and the fitted equation.

use polars::prelude::*;

use crate::{
  Align, Coefficients, Figure, LinearFit, PlotError, PredictionInterval, Range, Result, TextBox,
  Theme,
};

pub const REGRESSION_LINE_LABEL: &str = "Regression Line";
pub const CONFIDENCE_BAND_LABEL: &str = "95% CI";

/// Number of points the regression line and band are sampled at.
pub const DEFAULT_SAMPLES: usize = 100;

/// Axes-relative anchor of the equation box: top-left, inset 5%.
const ANNOTATION_ANCHOR: (f64, f64) = (0.05, 0.95);

/// Configuration for one regression plot.
#[derive(Debug, Clone)]
pub struct RegressionPlot<'a> {
  x:               &'a str,
  y:               &'a str,
  title:           String,
  confidence_band: bool,
  samples:         usize,
  theme:           Theme,
}

impl<'a> RegressionPlot<'a> {
  pub fn new(x: &'a str, y: &'a str) -> Self {
    RegressionPlot {
      x,
      y,
      title: String::new(),
      confidence_band: true,
      samples: DEFAULT_SAMPLES,
      theme: Theme::default(),
    }
  }

  pub fn title(&mut self, title: &str) -> &mut Self {
    self.title = title.to_string();
    self
  }

  /// Shade the model's 95% interval around the line. On by default.
  pub fn confidence_band(&mut self, enabled: bool) -> &mut Self {
    self.confidence_band = enabled;
    self
  }

  /// Sample count for the line and band. At least two samples are always used.
  pub fn samples(&mut self, samples: usize) -> &mut Self {
    self.samples = samples.max(2);
    self
  }

  pub fn theme(&mut self, theme: Theme) -> &mut Self {
    self.theme = theme;
    self
  }

  /// Composes the figure. Nothing is returned unless every layer could be
  /// built.
  pub fn render<M: LinearFit + ?Sized>(&self, data: &DataFrame, results: &M) -> Result<Figure> {
    let xs = numeric_column(data, self.x)?;
    let ys = numeric_column(data, self.y)?;

    let x_range = Range::from_values(xs.iter().flatten().copied()).ok_or_else(|| {
      PlotError::InvalidColumn { name: self.x.to_string(), reason: "no finite values".into() }
    })?;
    if x_range.size() == 0.0 {
      return Err(PlotError::DegenerateRange { value: x_range.min });
    }

    let coefficients = results.coefficients().validate()?;
    // A flat response gives an undefined R², printed as `NaN`.
    let r_squared = results.r_squared();

    let (points_x, points_y): (Vec<f64>, Vec<f64>) = xs
      .into_iter()
      .zip(ys)
      .filter_map(|pair| match pair {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
        _ => None,
      })
      .unzip();
    let skipped = data.height() - points_x.len();
    if skipped > 0 {
      log::debug!(
        target: "regplot",
        "skipping {skipped} rows with missing `{}` or `{}`",
        self.x,
        self.y
      );
    }

    let sample_x = x_range.linspace(self.samples);
    let line_y: Vec<f64> = sample_x.iter().map(|&x| coefficients.predict(x)).collect();

    let band = if self.confidence_band {
      let interval = results.predict_interval(&sample_x)?;
      interval.check_len(sample_x.len())?;
      warn_if_outside(&interval, &line_y);
      Some(interval)
    } else {
      None
    };

    let theme = &self.theme;
    let mut figure = Figure::with_theme(theme.clone());
    figure.title(&self.title).x_label(self.x).y_label(self.y);

    figure.scatter(points_x, points_y).color(theme.scatter_color()).size(theme.point_radius);
    figure
      .line(sample_x.clone(), line_y)
      .color(theme.line_color())
      .width(theme.line_width)
      .label(REGRESSION_LINE_LABEL);
    if let Some(PredictionInterval { lower, upper }) = band {
      figure
        .fill_between(sample_x, lower, upper)
        .color(theme.band_color())
        .label(CONFIDENCE_BAND_LABEL);
    }

    let (ax, ay) = ANNOTATION_ANCHOR;
    figure
      .annotate(&format_annotation(coefficients, r_squared), ax, ay)
      .vertical_align(Align::Start)
      .boxed(TextBox::rounded(theme.annotation_box_color()));

    figure.legend(true).grid(true).tight_layout(true);

    log::debug!(
      target: "regplot",
      "composed regression plot of `{}` against `{}` with {} layers",
      self.y,
      self.x,
      figure.layers().len()
    );
    Ok(figure)
  }
}

/// Renders `y` against `x` from `data`, with the fitted line of `results`.
pub fn plot_regression<M: LinearFit + ?Sized>(
  x: &str,
  y: &str,
  data: &DataFrame,
  results: &M,
  title: &str,
  add_confidence_interval: bool,
) -> Result<Figure> {
  RegressionPlot::new(x, y)
    .title(title)
    .confidence_band(add_confidence_interval)
    .render(data, results)
}

/// The two-line equation label, e.g. `y = 1.00 + 2.35x` over `R² = 0.812`.
pub fn format_annotation(coefficients: Coefficients, r_squared: f64) -> String {
  format!(
    "y = {:.2} + {:.2}x\nR² = {:.3}",
    coefficients.intercept, coefficients.slope, r_squared
  )
}

/// Reads a column as floats, keeping nulls so rows stay aligned.
fn numeric_column(data: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
  let column = data
    .column(name)
    .map_err(|_| PlotError::InvalidColumn { name: name.to_string(), reason: "not found".into() })?;

  if !column.dtype().is_numeric() {
    return Err(PlotError::InvalidColumn {
      name:   name.to_string(),
      reason: format!("expected a numeric column, found {}", column.dtype()),
    });
  }

  let column = column.cast(&DataType::Float64)?;
  Ok(column.as_materialized_series().f64()?.iter().collect())
}

/// Logs and returns how many line points fall outside the band.
fn warn_if_outside(interval: &PredictionInterval, line: &[f64]) -> usize {
  let outside = line
    .iter()
    .zip(interval.lower.iter().zip(&interval.upper))
    .filter(|(y, (lo, hi))| *y < *lo || *y > *hi)
    .count();
  if outside > 0 {
    log::warn!(target: "regplot", "regression line leaves the confidence band at {outside} points");
  }
  outside
}
