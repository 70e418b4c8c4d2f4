mod common;

use btc_predictor::config::FeatureConfig;
use btc_predictor::ml::{FeatureBuilder, LabelPolicy};
use btc_predictor::types::RawSeries;
use btc_predictor::PredictorError;
use common::{linear_series, wavy_series};

fn config(policy: LabelPolicy) -> FeatureConfig {
    FeatureConfig {
        label_policy: policy,
        ..Default::default()
    }
}

#[test]
fn test_row_counts_per_label_policy() {
    let series = wavy_series(60);

    let same_day = FeatureBuilder::new(config(LabelPolicy::SameDay)).build(&series).unwrap();
    assert_eq!(same_day.len(), 60 - 20);

    let next_day = FeatureBuilder::new(config(LabelPolicy::NextDay)).build(&series).unwrap();
    assert_eq!(next_day.len(), 60 - 20 - 1);
}

#[test]
fn test_rows_are_a_contiguous_tail() {
    let series = wavy_series(45);
    let dataset = FeatureBuilder::new(config(LabelPolicy::NextDay)).build(&series).unwrap();

    let expected = &series.timestamps()[20..44];
    assert_eq!(dataset.timestamps(), expected);
}

#[test]
fn test_all_values_finite() {
    let dataset = FeatureBuilder::new(FeatureConfig::default())
        .build(&wavy_series(80))
        .unwrap();

    for row in dataset.rows() {
        assert!(row.target.is_finite());
        assert!(row.features.values().iter().all(|v| v.is_finite()));
    }
}

#[test]
fn test_moving_averages_within_window_range() {
    let series = wavy_series(70);
    let closes = series.closes();
    let timestamps = series.timestamps();
    let rows = FeatureBuilder::new(FeatureConfig::default())
        .feature_rows(&series)
        .unwrap();

    for row in &rows {
        let i = timestamps.iter().position(|t| *t == row.timestamp).unwrap();
        for (ma, window) in [(row.ma_short, 5), (row.ma_long, 20)] {
            let slice = &closes[i + 1 - window..=i];
            let min = slice.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = slice.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!(ma >= min - 1e-9 && ma <= max + 1e-9);
        }
        assert!((row.prev_close - closes[i - 1]).abs() < 1e-12);
    }
}

#[test]
fn test_next_day_target_is_following_close() {
    let series = linear_series(40, 100.0, 10.0);
    let closes = series.closes();
    let dataset = FeatureBuilder::new(config(LabelPolicy::NextDay)).build(&series).unwrap();

    let first = &dataset.rows()[0];
    let i = series.timestamps().iter().position(|t| *t == first.timestamp()).unwrap();
    assert_eq!(first.target, closes[i + 1]);

    let same = FeatureBuilder::new(config(LabelPolicy::SameDay)).build(&series).unwrap();
    assert_eq!(same.rows()[0].target, closes[i]);
}

#[test]
fn test_feature_rows_keep_unlabeled_tail() {
    let series = wavy_series(50);
    let builder = FeatureBuilder::new(config(LabelPolicy::NextDay));

    let rows = builder.feature_rows(&series).unwrap();
    let dataset = builder.build(&series).unwrap();
    assert_eq!(rows.len(), dataset.len() + 1);
    assert_eq!(rows.last().unwrap().timestamp, series.last().unwrap().timestamp);
}

#[test]
fn test_optional_features_shrink_the_matrix() {
    let series = wavy_series(60);
    let config = FeatureConfig {
        include_volatility: false,
        include_volume: false,
        label_policy: LabelPolicy::SameDay,
        ..Default::default()
    };
    let dataset = FeatureBuilder::new(config).build(&series).unwrap();

    assert_eq!(dataset.feature_names().len(), 4);
    assert_eq!(dataset.feature_matrix().unwrap().ncols(), 4);
    // Only the long moving average limits the warm-up now
    assert_eq!(dataset.len(), 60 - 19);
}

#[test]
fn test_empty_series_is_insufficient() {
    let result = FeatureBuilder::new(FeatureConfig::default()).build(&RawSeries::default());
    assert!(matches!(result, Err(PredictorError::InsufficientData { .. })));
}

#[test]
fn test_short_series_is_insufficient() {
    // 22 rows leave a single next-day labeled row
    let result = FeatureBuilder::new(FeatureConfig::default()).build(&wavy_series(22));
    assert!(matches!(
        result,
        Err(PredictorError::InsufficientData { rows: 1, required: 2 })
    ));
}
