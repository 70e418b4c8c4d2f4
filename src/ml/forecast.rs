use crate::config::FeatureConfig;
use crate::error::{PredictorError, Result};
use crate::ml::dataset::{to_matrix, FeatureRow};
use crate::ml::features::FeatureBuilder;
use crate::ml::models::FittedModel;
use crate::types::RawSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Future dates paired 1:1 with predicted closes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub timestamps: Vec<NaiveDate>,
    pub predictions: Vec<f64>,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.predictions.iter().copied())
    }
}

/// Applies a fitted model to the trailing feature rows of a series.
///
/// The row built from day `T - h + k` is reported as the prediction for
/// day `T + k`; no row uses data from any forecasted day.
pub struct Forecaster {
    builder: FeatureBuilder,
}

impl Forecaster {
    /// `config` must match the configuration the model was trained with
    pub fn new(config: FeatureConfig) -> Self {
        Self {
            builder: FeatureBuilder::new(config),
        }
    }

    pub fn forecast(&self, model: &FittedModel, series: &RawSeries, horizon: usize) -> Result<Forecast> {
        if horizon == 0 {
            return Err(PredictorError::Validation(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }

        let required = self.builder.config().min_history() + horizon;
        let insufficient = || PredictorError::InsufficientHistory {
            available: series.len(),
            required,
            horizon,
        };

        if series.len() < required {
            return Err(insufficient());
        }

        let rows = self.builder.feature_rows(series)?;
        if rows.len() < horizon {
            return Err(insufficient());
        }

        let tail: Vec<&FeatureRow> = rows[rows.len() - horizon..].iter().collect();
        let predictions = self.predict_rows(model, &tail)?;
        let timestamps = future_timestamps(series, horizon)?;

        log::info!(
            "Forecast {} days from {} to {}",
            horizon,
            timestamps.first().map(|d| d.to_string()).unwrap_or_default(),
            timestamps.last().map(|d| d.to_string()).unwrap_or_default()
        );

        Ok(Forecast {
            timestamps,
            predictions,
        })
    }

    /// Prediction from the most recent complete feature row
    pub fn next_close(&self, model: &FittedModel, series: &RawSeries) -> Result<f64> {
        let rows = self.builder.feature_rows(series)?;
        let last = rows.last().ok_or(PredictorError::InsufficientHistory {
            available: series.len(),
            required: self.builder.config().min_history() + 1,
            horizon: 1,
        })?;

        let predictions = self.predict_rows(model, &[last])?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| PredictorError::Validation("Empty prediction".to_string()))
    }

    fn predict_rows(&self, model: &FittedModel, rows: &[&FeatureRow]) -> Result<Vec<f64>> {
        let matrix = to_matrix(rows, model.n_features())?;
        Ok(model.predict(matrix.view())?.to_vec())
    }
}

/// `horizon` dates continuing the series' cadence past its last observation
pub fn future_timestamps(series: &RawSeries, horizon: usize) -> Result<Vec<NaiveDate>> {
    let last = series
        .last()
        .ok_or_else(|| PredictorError::Validation("Cannot extend an empty series".to_string()))?
        .timestamp;
    let cadence = series.cadence();

    (1..=horizon as i32)
        .map(|k| {
            last.checked_add_signed(cadence * k).ok_or_else(|| {
                PredictorError::Validation(format!("Date overflow extending {} by {} steps", last, k))
            })
        })
        .collect()
}
