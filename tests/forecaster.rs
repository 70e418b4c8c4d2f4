mod common;

use btc_predictor::config::FeatureConfig;
use btc_predictor::ml::{FeatureBuilder, FittedModel, Forecaster, LinearRegressor};
use btc_predictor::types::RawSeries;
use btc_predictor::PredictorError;
use chrono::Duration;
use common::{linear_series, wavy_series};

fn fit(series: &RawSeries) -> FittedModel {
    let dataset = FeatureBuilder::new(FeatureConfig::default()).build(series).unwrap();
    let x = dataset.feature_matrix().unwrap();
    LinearRegressor::new().fit(x.view(), dataset.targets().view()).unwrap()
}

#[test]
fn test_horizon_yields_increasing_dates() {
    let series = wavy_series(80);
    let model = fit(&series);
    let last = series.last().unwrap().timestamp;

    for horizon in [1, 7, 30] {
        let forecast = Forecaster::new(FeatureConfig::default())
            .forecast(&model, &series, horizon)
            .unwrap();

        assert_eq!(forecast.len(), horizon);
        assert_eq!(forecast.timestamps.len(), horizon);
        assert_eq!(forecast.timestamps[0], last + Duration::days(1));
        assert!(forecast.timestamps.windows(2).all(|w| w[0] < w[1]));
        assert!(forecast.predictions.iter().all(|p| p.is_finite()));
    }
}

#[test]
fn test_insufficient_history() {
    let series = wavy_series(60);
    let model = fit(&series);

    // Warm-up of 20 plus a 7-day horizon needs 27 observations
    let short = RawSeries::new(series.points()[..26].to_vec()).unwrap();
    let result = Forecaster::new(FeatureConfig::default()).forecast(&model, &short, 7);
    assert!(matches!(
        result,
        Err(PredictorError::InsufficientHistory { available: 26, required: 27, horizon: 7 })
    ));

    let enough = RawSeries::new(series.points()[..27].to_vec()).unwrap();
    assert!(Forecaster::new(FeatureConfig::default())
        .forecast(&model, &enough, 7)
        .is_ok());
}

#[test]
fn test_history_covers_long_window_without_volatility() {
    let config = FeatureConfig {
        include_volatility: false,
        ..Default::default()
    };
    let series = wavy_series(60);
    let dataset = FeatureBuilder::new(config.clone()).build(&series).unwrap();
    let x = dataset.feature_matrix().unwrap();
    let model = LinearRegressor::new().fit(x.view(), dataset.targets().view()).unwrap();

    // The long window of 20 plus a 7-day horizon needs 27 observations
    let short = RawSeries::new(series.points()[..26].to_vec()).unwrap();
    assert!(matches!(
        Forecaster::new(config.clone()).forecast(&model, &short, 7),
        Err(PredictorError::InsufficientHistory { available: 26, required: 27, horizon: 7 })
    ));

    let enough = RawSeries::new(series.points()[..27].to_vec()).unwrap();
    assert_eq!(Forecaster::new(config).forecast(&model, &enough, 7).unwrap().len(), 7);
}

#[test]
fn test_next_close_on_linear_trend() {
    let series = linear_series(60, 100.0, 10.0);
    let model = fit(&series);
    let forecaster = Forecaster::new(FeatureConfig::default());

    let next = forecaster.next_close(&model, &series).unwrap();
    let last_close = series.last().unwrap().close;
    assert!((next - (last_close + 10.0)).abs() < 1e-3);

    let forecast = forecaster.forecast(&model, &series, 5).unwrap();
    assert!((forecast.predictions[4] - next).abs() < 1e-9);
}

#[test]
fn test_mismatched_model_is_rejected() {
    let series = wavy_series(60);
    let model = fit(&series);

    let narrower = FeatureConfig {
        include_volume: false,
        ..Default::default()
    };
    assert!(Forecaster::new(narrower).forecast(&model, &series, 3).is_err());
}
