use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::PredictorError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    pub provider: DataProvider,
    pub symbol: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub csv_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataProvider {
    Yahoo,
    Csv,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            provider: DataProvider::Yahoo,
            symbol: "BTC-USD".to_string(),
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 30,
            csv_path: None,
        }
    }
}

impl ConfigSection for DataSourceConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), PredictorError> {
        if self.symbol.trim().is_empty() {
            return Err(PredictorError::Configuration(
                "Symbol must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(PredictorError::Configuration(
                "HTTP timeout must be between 1 and 300 seconds".to_string(),
            ));
        }
        if self.provider == DataProvider::Csv && self.csv_path.is_none() {
            return Err(PredictorError::Configuration(
                "CSV provider selected but no CSV file configured".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Data Source".to_string(),
            fields: vec![
                FieldManifest::new(
                    "provider",
                    "enum",
                    serde_json::json!("yahoo"),
                    "Where price history is fetched from",
                ),
                FieldManifest::new(
                    "symbol",
                    "string",
                    serde_json::json!("BTC-USD"),
                    "Ticker requested from the provider",
                ),
                FieldManifest::new(
                    "timeout_secs",
                    "integer",
                    serde_json::json!(30),
                    "Upper bound on a single HTTP fetch",
                )
                .with_range(1.0, 300.0),
                FieldManifest::new(
                    "csv_path",
                    "path",
                    serde_json::Value::Null,
                    "OHLCV CSV file used by the CSV provider",
                ),
            ],
        }
    }
}
