pub mod dataset;
pub mod features;
pub mod forecast;
pub mod labeling;
pub mod models;
pub mod splitting;

pub use dataset::{FeatureRow, LabeledDataset, LabeledRow};
pub use features::FeatureBuilder;
pub use forecast::{Forecast, Forecaster};
pub use labeling::LabelPolicy;
pub use models::{FeatureImportance, FittedModel, LinearRegressor, RegressionMetrics};
pub use splitting::{DatasetSplitter, TrainTestSplit};
