pub mod linear;
pub mod metrics;

pub use linear::{FittedModel, LinearRegressor};
pub use metrics::{ranked, FeatureImportance, RegressionMetrics};
