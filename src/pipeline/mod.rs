//! One end-to-end run: fetch, build features, split, fit, evaluate, forecast.

pub mod request;

pub use request::{RunRequest, DEFAULT_LOOKBACK_DAYS};

use crate::config::{AppConfig, ConfigSection, FeatureConfig, SplitConfig};
use crate::data::MarketDataSource;
use crate::error::Result;
use crate::ml::{
    models::ranked, DatasetSplitter, FeatureBuilder, FeatureImportance, FeatureRow, FittedModel,
    Forecast, Forecaster, LinearRegressor, RegressionMetrics,
};
use crate::types::RawSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Model output on the held-out rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub timestamps: Vec<NaiveDate>,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
    pub metrics: RegressionMetrics,
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub request: RunRequest,
    pub source: String,
    pub series: RawSeries,
    /// Complete feature rows, including the unlabeled tail
    pub feature_rows: Vec<FeatureRow>,
    pub feature_names: Vec<String>,
    pub labeled_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub model: FittedModel,
    pub evaluation: Evaluation,
    pub importances: Vec<FeatureImportance>,
    pub forecast: Forecast,
    pub next_close: f64,
}

impl PipelineReport {
    pub fn ranked_importances(&self) -> Vec<FeatureImportance> {
        ranked(&self.importances)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows from {}: trained on {}, tested on {} (MSE {:.4}, R² {:.4})",
            self.series.len(),
            self.source,
            self.train_rows,
            self.test_rows,
            self.evaluation.metrics.mse,
            self.evaluation.metrics.r2
        )
    }
}

pub struct Pipeline {
    features: FeatureConfig,
    split: SplitConfig,
}

impl Pipeline {
    pub fn new(features: FeatureConfig, split: SplitConfig) -> Self {
        Self { features, split }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.features.clone(), config.split.clone())
    }

    pub fn run(&self, source: &dyn MarketDataSource, request: &RunRequest) -> Result<PipelineReport> {
        request.validate()?;
        self.features.validate()?;

        log::info!(
            "Running {} from {} to {} via {}",
            request.symbol,
            request.start,
            request.end,
            source.name()
        );

        let series = source.fetch(&request.symbol, request.start, request.end)?;
        self.run_on_series(source.name(), series, request)
    }

    /// Everything after the fetch, on an already loaded series
    pub fn run_on_series(
        &self,
        source: &str,
        series: RawSeries,
        request: &RunRequest,
    ) -> Result<PipelineReport> {
        let builder = FeatureBuilder::new(self.features.clone());
        let dataset = builder.build(&series)?;
        let split = DatasetSplitter::new(self.split.clone()).split(&dataset)?;

        let x_train = split.train.feature_matrix()?;
        let y_train = split.train.targets();
        let model = LinearRegressor::new().fit(x_train.view(), y_train.view())?;

        let x_test = split.test.feature_matrix()?;
        let y_test = split.test.targets();
        let predicted = model.predict(x_test.view())?;
        let metrics = RegressionMetrics::calculate(y_test.view(), predicted.view())?;

        log::info!(
            "Test MSE {:.4}, RMSE {:.4}, MAE {:.4}, R² {:.4}",
            metrics.mse,
            metrics.rmse,
            metrics.mae,
            metrics.r2
        );

        let importances = model.feature_importance(dataset.feature_names())?;

        let forecaster = Forecaster::new(self.features.clone());
        let forecast = forecaster.forecast(&model, &series, request.horizon)?;
        let next_close = forecaster.next_close(&model, &series)?;

        Ok(PipelineReport {
            request: request.clone(),
            source: source.to_string(),
            feature_rows: builder.feature_rows(&series)?,
            feature_names: dataset.feature_names().to_vec(),
            labeled_rows: dataset.len(),
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            evaluation: Evaluation {
                timestamps: split.test.timestamps(),
                actual: y_test.to_vec(),
                predicted: predicted.to_vec(),
                metrics,
            },
            model,
            importances,
            forecast,
            next_close,
            series,
        })
    }
}
