mod common;

use approx::assert_relative_eq;
use polars::prelude::*;
use regplot::{
  CONFIDENCE_BAND_LABEL, Coefficients, LinearFit, PlotError, REGRESSION_LINE_LABEL,
  RegressionPlot, plot_regression,
};
use rstest::rstest;

use common::*;

#[rstest]
#[case::with_band(true)]
#[case::without_band(false)]
fn renders_for_both_band_settings(#[case] add_ci: bool) {
  let figure = plot_regression("x", "y", &demo_frame(), &demo_fit(), "Demo", add_ci).unwrap();
  assert_eq!(band(&figure).is_some(), add_ci);
}

#[test]
fn end_to_end_demo() {
  let figure = plot_regression("x", "y", &demo_frame(), &demo_fit(), "Demo", true).unwrap();

  assert_eq!(scatter(&figure).len(), 5);

  let line = line(&figure);
  assert_eq!(line.x().len(), 100);
  assert_eq!(line.x()[0], 1.0);
  assert_eq!(line.x()[99], 5.0);

  let annotation = &figure.annotations()[0];
  assert_eq!(annotation.text(), "y = 2.20 + 0.60x\nR² = 0.600");
  assert!(annotation.text_box().is_some());
}

#[test]
fn line_follows_coefficients() {
  let fit =
    FixedFit { coefficients: Coefficients::new(-1.25, 0.75), r_squared: 0.9, half_width: 1.0 };
  let df = df! { "a" => &[-3.0, 0.5, 7.0], "b" => &[1.0, 2.0, 3.0] }.unwrap();
  let figure = plot_regression("a", "b", &df, &fit, "Line", false).unwrap();

  let line = line(&figure);
  assert_eq!(line.x().len(), 100);
  for (&x, &y) in line.x().iter().zip(line.y()) {
    assert_relative_eq!(y, -1.25 + 0.75 * x, epsilon = 1e-12);
  }
}

#[test]
fn no_band_means_single_legend_entry() {
  let figure = plot_regression("x", "y", &demo_frame(), &demo_fit(), "Demo", false).unwrap();
  let labels: Vec<String> = figure.legend_entries().into_iter().map(|e| e.label).collect();
  assert_eq!(labels, vec![REGRESSION_LINE_LABEL.to_string()]);
  assert!(band(&figure).is_none());
}

#[test]
fn band_is_labelled_and_brackets_line() {
  let figure = plot_regression("x", "y", &demo_frame(), &demo_fit(), "Demo", true).unwrap();
  let labels: Vec<String> = figure.legend_entries().into_iter().map(|e| e.label).collect();
  assert_eq!(labels, vec![REGRESSION_LINE_LABEL.to_string(), CONFIDENCE_BAND_LABEL.to_string()]);

  let band = band(&figure).unwrap();
  let line = line(&figure);
  assert_eq!(band.x(), line.x());
  for ((lo, hi), y) in band.lower().iter().zip(band.upper()).zip(line.y()) {
    assert!(lo <= y && y <= hi, "{lo} <= {y} <= {hi}");
  }
}

#[test]
fn band_and_line_share_hue() {
  let figure = plot_regression("x", "y", &demo_frame(), &demo_fit(), "Demo", true).unwrap();
  let line = line(&figure).options().color.components;
  let band = band(&figure).unwrap().options().color.components;
  assert_eq!(line[..3], band[..3]);
  assert_relative_eq!(band[3], 0.1);
  assert_relative_eq!(scatter(&figure).options().color.components[3], 0.5);
}

#[test]
fn decorations_are_set() {
  let figure = plot_regression("x", "y", &demo_frame(), &demo_fit(), "Demo", true).unwrap();
  assert_eq!(figure.get_title(), Some("Demo"));
  assert_eq!(figure.get_x_label(), Some("x"));
  assert_eq!(figure.get_y_label(), Some("y"));
  assert!(figure.has_legend());
  assert!(figure.has_grid());
  assert!(figure.is_tight_layout());
  assert_eq!(figure.size(), kurbo::Size::new(10.0, 6.0));

  let annotation = &figure.annotations()[0];
  assert_eq!(annotation.anchor(), kurbo::Point::new(0.05, 0.95));
}

#[rstest]
#[case::missing_x("a", "y", "x")]
#[case::missing_y("x", "b", "y")]
fn missing_column_is_invalid(#[case] first: &str, #[case] second: &str, #[case] absent: &str) {
  let df = df! { first => &[1.0, 2.0, 3.0], second => &[1.0, 2.0, 3.0] }.unwrap();
  let result = plot_regression("x", "y", &df, &demo_fit(), "Test", true);
  assert_invalid_column(result, absent);
}

#[test]
fn no_x_column_at_all() {
  let df = df! { "y" => &[1.0, 2.0] }.unwrap();
  assert_invalid_column(plot_regression("x", "y", &df, &demo_fit(), "Test", true), "x");
}

#[test]
fn text_column_is_invalid() {
  let df = df! { "x" => &[1.0, 2.0], "y" => &["a", "b"] }.unwrap();
  assert_invalid_column(plot_regression("x", "y", &df, &demo_fit(), "Test", false), "y");
}

#[test]
fn constant_x_is_degenerate() {
  let df = df! { "x" => &[2.0, 2.0, 2.0], "y" => &[1.0, 2.0, 3.0] }.unwrap();
  let err = plot_regression("x", "y", &df, &demo_fit(), "Flat", true).unwrap_err();
  assert!(matches!(err, PlotError::DegenerateRange { value } if value == 2.0));
}

#[test]
fn all_null_x_is_invalid() {
  let df = df! { "x" => &[None::<f64>, None], "y" => &[1.0, 2.0] }.unwrap();
  assert_invalid_column(plot_regression("x", "y", &df, &demo_fit(), "Nulls", false), "x");
}

#[test]
fn band_requires_interval_support() {
  let fit = PointFit(Coefficients::new(1.0, 1.0));
  let err = plot_regression("x", "y", &demo_frame(), &fit, "Points", true).unwrap_err();
  assert!(matches!(err, PlotError::IncompatibleModel(_)));

  assert!(plot_regression("x", "y", &demo_frame(), &fit, "Points", false).is_ok());
}

#[test]
fn short_interval_is_incompatible() {
  let err = plot_regression("x", "y", &demo_frame(), &TruncatedFit, "Short", true).unwrap_err();
  assert!(matches!(err, PlotError::IncompatibleModel(_)));
}

#[test]
fn non_finite_coefficients_are_incompatible() {
  let fit = PointFit(Coefficients::new(f64::NAN, 1.0));
  let err = plot_regression("x", "y", &demo_frame(), &fit, "NaN", false).unwrap_err();
  assert!(matches!(err, PlotError::IncompatibleModel(_)));
}

#[test]
fn rows_with_nulls_are_not_scattered() {
  let df = df! {
    "x" => &[Some(1.0), Some(2.0), None, Some(4.0)],
    "y" => &[Some(1.0), None, Some(3.0), Some(4.0)],
  }
  .unwrap();
  let figure = plot_regression("x", "y", &df, &demo_fit(), "Gaps", false).unwrap();
  assert_eq!(scatter(&figure).len(), 2);

  // The sampled range still spans every x value present.
  let line = line(&figure);
  assert_eq!((line.x()[0], line.x()[99]), (1.0, 4.0));
}

#[test]
fn integer_columns_are_accepted() {
  let df = df! { "x" => &[1i32, 2, 3, 4, 5], "y" => &[2i64, 4, 5, 4, 5] }.unwrap();
  let figure = plot_regression("x", "y", &df, &demo_fit(), "Ints", true).unwrap();
  assert_eq!(scatter(&figure).len(), 5);
}

#[test]
fn builder_sample_count_and_trait_object() {
  let fit: Box<dyn LinearFit> = Box::new(demo_fit());
  let figure = RegressionPlot::new("x", "y")
    .title("Builder")
    .samples(25)
    .confidence_band(true)
    .render(&demo_frame(), fit.as_ref())
    .unwrap();
  assert_eq!(line(&figure).x().len(), 25);
  assert_eq!(band(&figure).unwrap().lower().len(), 25);
}

#[test]
fn figure_draws_into_scene() {
  let figure = plot_regression("x", "y", &demo_frame(), &demo_fit(), "Scene", true).unwrap();
  let scene = figure.to_scene();
  assert!(!scene.encoding().is_empty());
}

#[test]
fn flat_response_still_renders() {
  let x = [1.0, 2.0, 3.0, 4.0];
  let y = [3.0, 3.0, 3.0, 3.0];
  let df = df! { "x" => &x, "y" => &y }.unwrap();
  let fit = OlsFit::fit(&x, &y);
  assert!(fit.r_squared().is_nan());

  let figure = plot_regression("x", "y", &df, &fit, "Flat", false).unwrap();
  assert_eq!(figure.annotations()[0].text(), "y = 3.00 + 0.00x\nR² = NaN");
  assert!(line(&figure).y().iter().all(|&y| y == 3.0));
}
