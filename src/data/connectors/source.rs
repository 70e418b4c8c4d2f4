use super::{csv::CsvSource, yahoo::YahooSource};
use crate::config::{DataProvider, DataSourceConfig};
use crate::error::{PredictorError, Result};
use crate::types::RawSeries;
use chrono::NaiveDate;

/// Anything that can produce a daily OHLCV series for a symbol.
///
/// `end` is inclusive. An empty result is reported as `DataUnavailable`,
/// never as an empty series.
pub trait MarketDataSource: Send + Sync {
    fn name(&self) -> &str;

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<RawSeries>;
}

/// Build the source selected in the configuration
pub fn from_config(config: &DataSourceConfig) -> Result<Box<dyn MarketDataSource>> {
    match config.provider {
        DataProvider::Yahoo => Ok(Box::new(YahooSource::new(
            &config.base_url,
            config.timeout_secs,
        )?)),
        DataProvider::Csv => {
            let path = config.csv_path.as_ref().ok_or_else(|| {
                PredictorError::Configuration("No CSV file configured".to_string())
            })?;
            Ok(Box::new(CsvSource::new(path)))
        }
    }
}

/// Restrict to `[start, end]` and reject an empty result
pub(crate) fn require_range(
    series: RawSeries,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RawSeries> {
    let ranged = series.within(start, end);
    if ranged.is_empty() {
        return Err(PredictorError::DataUnavailable(format!(
            "No {} observations between {} and {}",
            symbol, start, end
        )));
    }
    Ok(ranged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_factory_follows_provider() {
        let yahoo = from_config(&DataSourceConfig::default()).unwrap();
        assert_eq!(yahoo.name(), "Yahoo Finance");

        let config = DataSourceConfig {
            provider: DataProvider::Csv,
            csv_path: Some(PathBuf::from("prices.csv")),
            ..Default::default()
        };
        let csv = from_config(&config).unwrap();
        assert_eq!(csv.name(), "CSV");
    }

    #[test]
    fn test_csv_without_path_is_a_configuration_error() {
        let config = DataSourceConfig {
            provider: DataProvider::Csv,
            ..Default::default()
        };
        assert!(matches!(
            from_config(&config),
            Err(PredictorError::Configuration(_))
        ));
    }
}
