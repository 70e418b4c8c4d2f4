use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::PredictorError;
use crate::ml::labeling::LabelPolicy;
use serde::{Deserialize, Serialize};

/// Upper bound on the forecast horizon offered to the user
pub const MAX_HORIZON: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub short_window: usize,
    pub long_window: usize,
    /// Defaults to `long_window` when unset
    pub volatility_window: Option<usize>,
    pub include_volatility: bool,
    pub include_volume: bool,
    pub label_policy: LabelPolicy,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            short_window: 5,
            long_window: 20,
            volatility_window: None,
            include_volatility: true,
            include_volume: true,
            label_policy: LabelPolicy::NextDay,
        }
    }
}

impl FeatureConfig {
    pub fn effective_volatility_window(&self) -> usize {
        self.volatility_window.unwrap_or(self.long_window)
    }

    /// Number of leading observations that can never carry a complete feature row
    pub fn warmup(&self) -> usize {
        let mut warmup = 1.max(self.short_window.saturating_sub(1)).max(self.long_window.saturating_sub(1));
        if self.include_volatility {
            warmup = warmup.max(self.effective_volatility_window());
        }
        warmup
    }

    /// Observations needed before the first forecastable day: the full long
    /// window, or the warm-up when volatility reaches further back
    pub fn min_history(&self) -> usize {
        self.long_window.max(self.warmup())
    }
}

impl ConfigSection for FeatureConfig {
    fn section_name() -> &'static str {
        "features"
    }

    fn validate(&self) -> Result<(), PredictorError> {
        if self.short_window < 1 {
            return Err(PredictorError::Configuration(
                "Short window must be at least 1".to_string(),
            ));
        }
        if self.long_window <= self.short_window {
            return Err(PredictorError::Configuration(
                "Long window must be larger than the short window".to_string(),
            ));
        }
        if self.include_volatility && self.effective_volatility_window() < 2 {
            return Err(PredictorError::Configuration(
                "Volatility window must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Features".to_string(),
            fields: vec![
                FieldManifest::new(
                    "short_window",
                    "integer",
                    serde_json::json!(5),
                    "Days in the short moving average",
                )
                .with_range(2.0, 14.0),
                FieldManifest::new(
                    "long_window",
                    "integer",
                    serde_json::json!(20),
                    "Days in the long moving average",
                )
                .with_range(10.0, 60.0),
                FieldManifest::new(
                    "include_volatility",
                    "bool",
                    serde_json::json!(true),
                    "Rolling standard deviation of daily return",
                ),
                FieldManifest::new(
                    "include_volume",
                    "bool",
                    serde_json::json!(true),
                    "Use traded volume as a feature",
                ),
                FieldManifest::new(
                    "label_policy",
                    "enum",
                    serde_json::json!("next_day"),
                    "Same-day close or next-day close as the regression target",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub test_fraction: f64,
    pub chronological: bool,
    pub seed: Option<u64>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            chronological: true,
            seed: Some(42),
        }
    }
}

impl ConfigSection for SplitConfig {
    fn section_name() -> &'static str {
        "split"
    }

    fn validate(&self) -> Result<(), PredictorError> {
        if self.test_fraction <= 0.0 || self.test_fraction >= 1.0 {
            return Err(PredictorError::Configuration(
                "Test fraction must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Train/Test Split".to_string(),
            fields: vec![
                FieldManifest::new(
                    "test_fraction",
                    "float",
                    serde_json::json!(0.2),
                    "Share of labeled rows held out for evaluation",
                )
                .with_range(0.05, 0.5),
                FieldManifest::new(
                    "chronological",
                    "bool",
                    serde_json::json!(true),
                    "Hold out the most recent rows instead of a random sample",
                ),
                FieldManifest::new(
                    "seed",
                    "integer",
                    serde_json::json!(42),
                    "Seed for the random split",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { horizon: 7 }
    }
}

impl ConfigSection for ForecastConfig {
    fn section_name() -> &'static str {
        "forecast"
    }

    fn validate(&self) -> Result<(), PredictorError> {
        if self.horizon < 1 || self.horizon > MAX_HORIZON {
            return Err(PredictorError::Configuration(format!(
                "Forecast horizon must be between 1 and {} days",
                MAX_HORIZON
            )));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Forecast".to_string(),
            fields: vec![FieldManifest::new(
                "horizon",
                "integer",
                serde_json::json!(7),
                "Number of days for prediction",
            )
            .with_range(1.0, MAX_HORIZON as f64)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FeatureConfig::default().validate().is_ok());
        assert!(SplitConfig::default().validate().is_ok());
        assert!(ForecastConfig::default().validate().is_ok());
    }

    #[test]
    fn test_warmup_follows_longest_window() {
        let config = FeatureConfig::default();
        assert_eq!(config.warmup(), 20);

        let without_volatility = FeatureConfig {
            include_volatility: false,
            ..FeatureConfig::default()
        };
        assert_eq!(without_volatility.warmup(), 19);

        let wide_volatility = FeatureConfig {
            volatility_window: Some(30),
            ..FeatureConfig::default()
        };
        assert_eq!(wide_volatility.warmup(), 30);
        assert_eq!(wide_volatility.min_history(), 30);
        assert_eq!(without_volatility.min_history(), 20);
    }

    #[test]
    fn test_rejects_bad_values() {
        let windows = FeatureConfig {
            short_window: 20,
            long_window: 20,
            ..FeatureConfig::default()
        };
        assert!(windows.validate().is_err());

        let split = SplitConfig {
            test_fraction: 1.0,
            ..SplitConfig::default()
        };
        assert!(split.validate().is_err());

        assert!(ForecastConfig { horizon: 0 }.validate().is_err());
        assert!(ForecastConfig { horizon: 31 }.validate().is_err());
    }

    #[test]
    fn test_manifest_ranges() {
        let manifest = ForecastConfig::default().to_manifest();
        let horizon = manifest.field("horizon").unwrap();
        assert_eq!(horizon.bounds_or(0.0, 0.0), (1.0, 30.0));
    }
}
