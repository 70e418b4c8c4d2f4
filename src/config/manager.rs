use super::{
    data_source::DataSourceConfig,
    ml::{FeatureConfig, ForecastConfig, SplitConfig},
    traits::ConfigSection,
};
use crate::error::PredictorError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix for environment overrides, e.g. `BTCP_SPLIT__TEST_FRACTION=0.3`
pub const ENV_PREFIX: &str = "BTCP";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataSourceConfig,
    pub features: FeatureConfig,
    pub split: SplitConfig,
    pub forecast: ForecastConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), PredictorError> {
        self.data.validate()?;
        self.features.validate()?;
        self.split.validate()?;
        self.forecast.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML/JSON file layered with `BTCP_`-prefixed environment variables
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PredictorError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| PredictorError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| PredictorError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        log::info!("Loaded configuration from {}", path.as_ref().display());

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PredictorError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| PredictorError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| PredictorError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Apply `f` to a copy and keep it only if the result validates
    pub fn update<F>(&self, f: F) -> Result<(), PredictorError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        candidate.validate()?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::labeling::LabelPolicy;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("btc_predictor_{}_{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.features.short_window = 7;
                c.features.long_window = 30;
                c.features.label_policy = LabelPolicy::SameDay;
                c.split.chronological = false;
            })
            .unwrap();

        let path = temp_path("round_trip");
        manager.save_to_file(&path).unwrap();

        let loaded = ConfigManager::new();
        loaded.load_from_file(&path).unwrap();
        let config = loaded.get();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.features.short_window, 7);
        assert_eq!(config.features.long_window, 30);
        assert_eq!(config.features.label_policy, LabelPolicy::SameDay);
        assert!(!config.split.chronological);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, "[forecast]\nhorizon = 14\n").unwrap();

        let manager = ConfigManager::new();
        manager.load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let config = manager.get();
        assert_eq!(config.forecast.horizon, 14);
        assert_eq!(config.features.long_window, 20);
        assert_eq!(config.data.symbol, "BTC-USD");
    }

    #[test]
    fn test_invalid_update_is_rejected() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.forecast.horizon = 90);
        assert!(result.is_err());
        assert_eq!(manager.get().forecast.horizon, 7);
    }
}
