use crate::config::{ConfigSection, FeatureConfig};
use crate::error::{PredictorError, Result};
use crate::ml::dataset::{FeatureRow, LabeledDataset, LabeledRow};
use crate::types::RawSeries;
use polars::prelude::*;

/// Smallest dataset that still yields a non-empty train and test subset
pub const MIN_LABELED_ROWS: usize = 2;

pub const PREV_CLOSE: &str = "prev_close";
pub const MA_SHORT: &str = "ma_short";
pub const MA_LONG: &str = "ma_long";
pub const DAILY_RETURN: &str = "daily_return";
pub const VOLATILITY: &str = "volatility";
pub const VOLUME: &str = "volume";

/// Turns a raw OHLCV series into trailing-window features and labels.
///
/// Every feature at index `i` is computed from observations `<= i`. Rows
/// whose windows are not fully populated are dropped rather than filled.
pub struct FeatureBuilder {
    config: FeatureConfig,
}

impl FeatureBuilder {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec![PREV_CLOSE, MA_SHORT, MA_LONG, DAILY_RETURN];
        if self.config.include_volatility {
            names.push(VOLATILITY);
        }
        if self.config.include_volume {
            names.push(VOLUME);
        }
        names.into_iter().map(String::from).collect()
    }

    /// Labeled dataset under the configured label policy
    pub fn build(&self, series: &RawSeries) -> Result<LabeledDataset> {
        let closes = series.closes();
        let policy = self.config.label_policy;

        let rows: Vec<LabeledRow> = self
            .indexed_rows(series)?
            .into_iter()
            .filter_map(|(idx, features)| {
                policy
                    .target(&closes, idx)
                    .map(|target| LabeledRow { features, target })
            })
            .collect();

        log::debug!(
            "Built {} labeled rows from {} observations ({:?})",
            rows.len(),
            series.len(),
            policy
        );

        if rows.len() < MIN_LABELED_ROWS {
            return Err(PredictorError::InsufficientData {
                rows: rows.len(),
                required: MIN_LABELED_ROWS,
            });
        }

        Ok(LabeledDataset::new(self.feature_names(), rows))
    }

    /// Every complete feature row, including ones with no target yet
    pub fn feature_rows(&self, series: &RawSeries) -> Result<Vec<FeatureRow>> {
        Ok(self
            .indexed_rows(series)?
            .into_iter()
            .map(|(_, row)| row)
            .collect())
    }

    fn indexed_rows(&self, series: &RawSeries) -> Result<Vec<(usize, FeatureRow)>> {
        self.config.validate()?;
        if series.len() <= self.config.warmup() {
            return Ok(Vec::new());
        }

        let df = self.compute_frame(series)?;
        let prev_close = df.column(PREV_CLOSE)?.f64()?;
        let ma_short = df.column(MA_SHORT)?.f64()?;
        let ma_long = df.column(MA_LONG)?.f64()?;
        let daily_return = df.column(DAILY_RETURN)?.f64()?;
        let volatility_col = if self.config.include_volatility {
            Some(df.column(VOLATILITY)?.f64()?)
        } else {
            None
        };

        let mut rows = Vec::with_capacity(series.len() - self.config.warmup());

        for (idx, point) in series.points().iter().enumerate() {
            let (Some(prev), Some(short), Some(long), Some(ret)) = (
                prev_close.get(idx),
                ma_short.get(idx),
                ma_long.get(idx),
                daily_return.get(idx),
            ) else {
                continue;
            };

            let volatility = match volatility_col {
                Some(values) => match values.get(idx) {
                    Some(v) => Some(v),
                    None => continue,
                },
                None => None,
            };

            let row = FeatureRow {
                timestamp: point.timestamp,
                prev_close: prev,
                ma_short: short,
                ma_long: long,
                daily_return: ret,
                volatility,
                volume: self.config.include_volume.then_some(point.volume),
            };

            if row.values().iter().all(|v| v.is_finite()) {
                rows.push((idx, row));
            } else {
                log::debug!("Dropping non-finite feature row at {}", point.timestamp);
            }
        }

        Ok(rows)
    }

    fn compute_frame(&self, series: &RawSeries) -> Result<DataFrame> {
        let window = |size: usize| RollingOptionsFixedWindow {
            window_size: size,
            min_periods: size,
            ..Default::default()
        };

        let prev_close = col("close").shift(lit(1));
        let daily_return = (col("close") - prev_close.clone()) / prev_close.clone();

        let mut exprs = vec![
            prev_close.alias(PREV_CLOSE),
            col("close")
                .rolling_mean(window(self.config.short_window))
                .alias(MA_SHORT),
            col("close")
                .rolling_mean(window(self.config.long_window))
                .alias(MA_LONG),
            daily_return.clone().alias(DAILY_RETURN),
        ];

        if self.config.include_volatility {
            exprs.push(
                daily_return
                    .rolling_std(window(self.config.effective_volatility_window()))
                    .alias(VOLATILITY),
            );
        }

        let df = series.to_dataframe()?.lazy().with_columns(exprs).collect()?;

        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::labeling::LabelPolicy;
    use crate::types::TimePoint;
    use chrono::{Duration, NaiveDate};

    fn series(closes: &[f64]) -> RawSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| TimePoint {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0 + i as f64,
            })
            .collect();
        RawSeries::new(points).unwrap()
    }

    fn small_config(policy: LabelPolicy) -> FeatureConfig {
        FeatureConfig {
            short_window: 2,
            long_window: 3,
            volatility_window: None,
            include_volatility: false,
            include_volume: false,
            label_policy: policy,
        }
    }

    #[test]
    fn test_hand_computed_features() {
        let builder = FeatureBuilder::new(small_config(LabelPolicy::SameDay));
        let rows = builder.feature_rows(&series(&[10.0, 20.0, 30.0, 60.0])).unwrap();

        // Warm-up is max(long - 1, 1) = 2 observations
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.prev_close, 20.0);
        assert!((first.ma_short - 25.0).abs() < 1e-12);
        assert!((first.ma_long - 20.0).abs() < 1e-12);
        assert!((first.daily_return - 0.5).abs() < 1e-12);

        let second = &rows[1];
        assert_eq!(second.prev_close, 30.0);
        assert!((second.ma_short - 45.0).abs() < 1e-12);
        assert!((second.daily_return - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_day_and_next_day_targets() {
        let data = series(&[10.0, 20.0, 30.0, 60.0, 50.0]);

        let same_day = FeatureBuilder::new(small_config(LabelPolicy::SameDay))
            .build(&data)
            .unwrap();
        assert_eq!(same_day.len(), 3);
        assert_eq!(same_day.targets().to_vec(), vec![30.0, 60.0, 50.0]);

        let next_day = FeatureBuilder::new(small_config(LabelPolicy::NextDay))
            .build(&data)
            .unwrap();
        assert_eq!(next_day.len(), 2);
        assert_eq!(next_day.targets().to_vec(), vec![60.0, 50.0]);
    }

    #[test]
    fn test_volatility_is_sample_std_of_returns() {
        let config = FeatureConfig {
            include_volatility: true,
            volatility_window: Some(2),
            ..small_config(LabelPolicy::SameDay)
        };
        let rows = FeatureBuilder::new(config)
            .feature_rows(&series(&[10.0, 20.0, 30.0, 60.0]))
            .unwrap();

        // Returns: [-, 1.0, 0.5, 1.0]; first full 2-window of returns ends at index 2
        assert_eq!(rows.len(), 2);
        let expected = (0.5f64 - 1.0).abs() / 2f64.sqrt();
        assert!((rows[0].volatility.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_close_rows_are_dropped() {
        let rows = FeatureBuilder::new(small_config(LabelPolicy::SameDay))
            .feature_rows(&series(&[10.0, 0.0, 30.0, 40.0, 50.0]))
            .unwrap();

        // Return at index 2 divides by a zero close
        assert!(rows.iter().all(|r| r.values().iter().all(|v| v.is_finite())));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_zero_window_is_a_configuration_error() {
        let data = series(&[10.0, 20.0, 30.0, 60.0, 50.0]);

        let zero_short = FeatureConfig {
            short_window: 0,
            ..small_config(LabelPolicy::NextDay)
        };
        assert!(matches!(
            FeatureBuilder::new(zero_short).build(&data),
            Err(PredictorError::Configuration(_))
        ));

        let zero_long = FeatureConfig {
            long_window: 0,
            ..small_config(LabelPolicy::NextDay)
        };
        assert!(matches!(
            FeatureBuilder::new(zero_long).feature_rows(&data),
            Err(PredictorError::Configuration(_))
        ));
    }

    #[test]
    fn test_feature_names_follow_config() {
        let builder = FeatureBuilder::new(FeatureConfig::default());
        assert_eq!(
            builder.feature_names(),
            vec!["prev_close", "ma_short", "ma_long", "daily_return", "volatility", "volume"]
        );
    }
}
