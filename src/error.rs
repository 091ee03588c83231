use polars::error::PolarsError;
use thiserror::Error;

/// Errors produced while composing or outputting a figure.
#[derive(Debug, Error)]
pub enum PlotError {
  /// A referenced column is missing from the dataset or is not numeric.
  #[error("invalid column `{name}`: {reason}")]
  InvalidColumn { name: String, reason: String },

  /// The fitted model can't be used for a simple linear regression plot.
  #[error("incompatible model: {0}")]
  IncompatibleModel(String),

  /// The x column spans a single value, so there is nothing to sample.
  #[error("degenerate x range: every value is {value}")]
  DegenerateRange { value: f64 },

  #[error("gpu error: {0}")]
  Gpu(String),

  #[error("window error: {0}")]
  Window(String),

  #[error("image error: {0}")]
  Image(#[from] image::ImageError),

  #[error("dataframe error: {0}")]
  Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, PlotError>;
