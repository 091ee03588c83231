//! The capability a fitted regression result must provide to be plotted.
//!
//! Regression libraries each have their own result types. Rather than
//! depending on any of them, the renderer asks for a [`LinearFit`], and callers
//! adapt whatever they fitted at the call boundary.

use crate::{PlotError, Result};

/// The two parameters of a simple linear regression, `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
  pub intercept: f64,
  pub slope:     f64,
}

/// Lower and upper bounds of a prediction interval, one entry per queried x.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionInterval {
  pub lower: Vec<f64>,
  pub upper: Vec<f64>,
}

/// A fitted simple linear regression.
pub trait LinearFit {
  fn coefficients(&self) -> Coefficients;

  /// Coefficient of determination of the fit.
  fn r_squared(&self) -> f64;

  /// Returns the 95% interval for the mean response at each of `xs`.
  ///
  /// Models that can't produce intervals keep the default, which fails with
  /// [`PlotError::IncompatibleModel`].
  fn predict_interval(&self, xs: &[f64]) -> Result<PredictionInterval> {
    let _ = xs;
    Err(PlotError::IncompatibleModel("model does not support interval prediction".into()))
  }
}

impl Coefficients {
  pub const fn new(intercept: f64, slope: f64) -> Self { Coefficients { intercept, slope } }

  pub fn predict(&self, x: f64) -> f64 { self.intercept + self.slope * x }

  pub(crate) fn validate(self) -> Result<Self> {
    if self.intercept.is_finite() && self.slope.is_finite() {
      Ok(self)
    } else {
      Err(PlotError::IncompatibleModel(format!(
        "coefficients must be finite, got intercept {} and slope {}",
        self.intercept, self.slope
      )))
    }
  }
}

/// Adapts a positional parameter vector, ordered `[intercept, slope]`.
impl TryFrom<&[f64]> for Coefficients {
  type Error = PlotError;

  fn try_from(params: &[f64]) -> Result<Self> {
    match *params {
      [intercept, slope] => Ok(Coefficients { intercept, slope }),
      _ => Err(PlotError::IncompatibleModel(format!(
        "expected 2 coefficients (intercept, slope), got {}",
        params.len()
      ))),
    }
  }
}

impl PredictionInterval {
  pub fn len(&self) -> usize { self.lower.len() }
  pub fn is_empty(&self) -> bool { self.lower.is_empty() }

  pub(crate) fn check_len(&self, expected: usize) -> Result<()> {
    if self.lower.len() != expected || self.upper.len() != expected {
      return Err(PlotError::IncompatibleModel(format!(
        "interval prediction returned {} lower and {} upper bounds for {} points",
        self.lower.len(),
        self.upper.len(),
        expected
      )));
    }
    Ok(())
  }
}
