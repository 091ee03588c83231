#![allow(dead_code)]

use polars::prelude::*;
use regplot::{
  BandLayer, Coefficients, Figure, Layer, LineLayer, LinearFit, PlotError, PredictionInterval,
  ScatterLayer,
};

/// A model with fixed coefficients and a band of constant half width.
pub struct FixedFit {
  pub coefficients: Coefficients,
  pub r_squared:    f64,
  pub half_width:   f64,
}

impl LinearFit for FixedFit {
  fn coefficients(&self) -> Coefficients { self.coefficients }
  fn r_squared(&self) -> f64 { self.r_squared }

  fn predict_interval(&self, xs: &[f64]) -> regplot::Result<PredictionInterval> {
    Ok(PredictionInterval {
      lower: xs.iter().map(|&x| self.coefficients.predict(x) - self.half_width).collect(),
      upper: xs.iter().map(|&x| self.coefficients.predict(x) + self.half_width).collect(),
    })
  }
}

/// A model that can only give point predictions.
pub struct PointFit(pub Coefficients);

impl LinearFit for PointFit {
  fn coefficients(&self) -> Coefficients { self.0 }
  fn r_squared(&self) -> f64 { 0.5 }
}

/// A model whose interval is one point short.
pub struct TruncatedFit;

impl LinearFit for TruncatedFit {
  fn coefficients(&self) -> Coefficients { Coefficients::new(0.0, 1.0) }
  fn r_squared(&self) -> f64 { 1.0 }

  fn predict_interval(&self, xs: &[f64]) -> regplot::Result<PredictionInterval> {
    let n = xs.len().saturating_sub(1);
    Ok(PredictionInterval { lower: vec![0.0; n], upper: vec![1.0; n] })
  }
}

/// Ordinary least squares on one predictor, with the interval for the mean
/// response built from Student's t.
pub struct OlsFit {
  coefficients: Coefficients,
  r_squared:    f64,
  n:            f64,
  mean_x:       f64,
  sxx:          f64,
  residual_sd:  f64,
}

impl OlsFit {
  pub fn fit(x: &[f64], y: &[f64]) -> OlsFit {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let sxx: f64 = x.iter().map(|x| (x - mean_x).powi(2)).sum();
    let sxy: f64 = x.iter().zip(y).map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let syy: f64 = y.iter().map(|y| (y - mean_y).powi(2)).sum();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let sse = syy - slope * sxy;

    OlsFit {
      coefficients: Coefficients::new(intercept, slope),
      r_squared: 1.0 - sse / syy,
      n,
      mean_x,
      sxx,
      residual_sd: (sse / (n - 2.0)).sqrt(),
    }
  }
}

impl LinearFit for OlsFit {
  fn coefficients(&self) -> Coefficients { self.coefficients }
  fn r_squared(&self) -> f64 { self.r_squared }

  fn predict_interval(&self, xs: &[f64]) -> regplot::Result<PredictionInterval> {
    let t = t_975(self.n as usize - 2);
    let (lower, upper) = xs
      .iter()
      .map(|&x| {
        let se = self.residual_sd * (1.0 / self.n + (x - self.mean_x).powi(2) / self.sxx).sqrt();
        let y = self.coefficients.predict(x);
        (y - t * se, y + t * se)
      })
      .unzip();
    Ok(PredictionInterval { lower, upper })
  }
}

/// Two-sided 95% critical value of Student's t.
fn t_975(df: usize) -> f64 {
  const TABLE: [f64; 10] = [12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228];
  match df {
    1..=10 => TABLE[df - 1],
    _ => 1.96,
  }
}

pub fn demo_frame() -> DataFrame {
  df! {
    "x" => &[1.0, 2.0, 3.0, 4.0, 5.0],
    "y" => &[2.0, 4.0, 5.0, 4.0, 5.0],
  }
  .unwrap()
}

pub fn demo_fit() -> OlsFit { OlsFit::fit(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 5.0, 4.0, 5.0]) }

pub fn scatter(figure: &Figure) -> &ScatterLayer {
  figure
    .layers()
    .iter()
    .find_map(|l| match l {
      Layer::Scatter(s) => Some(s),
      _ => None,
    })
    .expect("figure has no scatter layer")
}

pub fn line(figure: &Figure) -> &LineLayer {
  figure
    .layers()
    .iter()
    .find_map(|l| match l {
      Layer::Line(s) => Some(s),
      _ => None,
    })
    .expect("figure has no line layer")
}

pub fn band(figure: &Figure) -> Option<&BandLayer> {
  figure.layers().iter().find_map(|l| match l {
    Layer::Band(s) => Some(s),
    _ => None,
  })
}

pub fn assert_invalid_column(result: regplot::Result<Figure>, expected: &str) {
  match result {
    Err(PlotError::InvalidColumn { name, .. }) => assert_eq!(name, expected),
    Err(e) => panic!("expected InvalidColumn for `{expected}`, got {e}"),
    Ok(_) => panic!("expected InvalidColumn for `{expected}`, got a figure"),
  }
}
