mod common;

use btc_predictor::config::FeatureConfig;
use btc_predictor::ml::{FeatureBuilder, LinearRegressor, RegressionMetrics};
use btc_predictor::PredictorError;
use common::wavy_series;
use ndarray::{array, Array1, Array2};

#[test]
fn test_recovers_line() {
    let x: Array2<f64> = Array2::from_shape_fn((10, 1), |(i, _)| i as f64);
    let y: Array1<f64> = x.column(0).mapv(|v| 2.0 * v + 3.0);

    let model = LinearRegressor::new().fit(x.view(), y.view()).unwrap();
    assert!((model.coefficients[0] - 2.0).abs() < 1e-9);
    assert!((model.intercept - 3.0).abs() < 1e-9);

    let metrics = model.evaluate(x.view(), y.view()).unwrap();
    assert!((metrics.r2 - 1.0).abs() < 1e-12);
    assert!(metrics.mse < 1e-18);
}

#[test]
fn test_fit_is_deterministic() {
    let dataset = FeatureBuilder::new(FeatureConfig::default())
        .build(&wavy_series(90))
        .unwrap();
    let x = dataset.feature_matrix().unwrap();
    let y = dataset.targets();

    let first = LinearRegressor::new().fit(x.view(), y.view()).unwrap();
    let second = LinearRegressor::new().fit(x.view(), y.view()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.n_train, dataset.len());
}

#[test]
fn test_constant_column_is_degenerate() {
    let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0], [4.0, 5.0]];
    let y = array![1.0, 2.0, 3.0, 4.0];

    let result = LinearRegressor::new().fit(x.view(), y.view());
    assert!(matches!(result, Err(PredictorError::DegenerateInput(_))));
}

#[test]
fn test_mismatched_rows_are_degenerate() {
    let x = array![[1.0], [2.0], [3.0]];
    let y = array![1.0, 2.0];

    let result = LinearRegressor::new().fit(x.view(), y.view());
    assert!(matches!(result, Err(PredictorError::DegenerateInput(_))));
}

#[test]
fn test_metrics_on_noisy_fit() {
    let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
    let y = array![1.1, 1.9, 3.2, 3.8, 5.1];

    let model = LinearRegressor::new().fit(x.view(), y.view()).unwrap();
    let predicted = model.predict(x.view()).unwrap();
    let metrics = RegressionMetrics::calculate(y.view(), predicted.view()).unwrap();

    assert!(metrics.r2 > 0.95 && metrics.r2 < 1.0);
    assert!((metrics.rmse - metrics.mse.sqrt()).abs() < 1e-12);
    assert!(metrics.mae > 0.0);
}

#[test]
fn test_importance_matches_feature_names() {
    let dataset = FeatureBuilder::new(FeatureConfig::default())
        .build(&wavy_series(90))
        .unwrap();
    let x = dataset.feature_matrix().unwrap();
    let model = LinearRegressor::new().fit(x.view(), dataset.targets().view()).unwrap();

    let importances = model.feature_importance(dataset.feature_names()).unwrap();
    assert_eq!(importances.len(), 6);
    for (importance, name) in importances.iter().zip(dataset.feature_names()) {
        assert_eq!(&importance.feature, name);
        assert_eq!(importance.importance, importance.coefficient.abs());
    }
}
