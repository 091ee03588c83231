use polars::prelude::*;
use regplot::{Coefficients, LinearFit, PredictionInterval, plot_regression};

/// Least squares fit of `y` on `x`, adapted to the plotting interface.
struct Ols {
  coefficients: Coefficients,
  r_squared:    f64,
  n:            f64,
  mean_x:       f64,
  sxx:          f64,
  residual_sd:  f64,
}

impl Ols {
  fn fit(df: &DataFrame, x: &str, y: &str) -> PolarsResult<Ols> {
    let xs = values(df, x)?;
    let ys = values(df, y)?;

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    let sxy: f64 = xs.iter().zip(&ys).map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let syy: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();

    let slope = sxy / sxx;
    let sse = syy - slope * sxy;

    Ok(Ols {
      coefficients: Coefficients::new(mean_y - slope * mean_x, slope),
      r_squared: 1.0 - sse / syy,
      n,
      mean_x,
      sxx,
      residual_sd: (sse / (n - 2.0)).sqrt(),
    })
  }
}

fn values(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
  let column = df.column(name)?.cast(&DataType::Float64)?;
  Ok(column.as_materialized_series().f64()?.into_no_null_iter().collect())
}

impl LinearFit for Ols {
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

/// Two-sided 95% critical value of Student's t with `df` degrees of freedom.
fn t_975(df: usize) -> f64 {
  const TABLE: [f64; 10] = [12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228];
  match df {
    1..=10 => TABLE[df - 1],
    _ => 1.96,
  }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  let df = df! {
    "hours" => &[1.0, 2.0, 2.5, 3.0, 4.0, 4.5, 5.0, 6.0, 7.0, 8.0],
    "score" => &[52.0, 55.0, 61.0, 58.0, 66.0, 70.0, 68.0, 75.0, 79.0, 85.0],
  }?;

  let fit = Ols::fit(&df, "hours", "score")?;
  let figure = plot_regression("hours", "score", &df, &fit, "Study time vs. score", true)?;

  figure.save("regression.png")?;
  figure.show()?;

  Ok(())
}
