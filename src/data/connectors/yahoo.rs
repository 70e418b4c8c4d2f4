//! Daily candles from the Yahoo Finance chart API.

use super::source::{require_range, MarketDataSource};
use crate::error::{PredictorError, Result};
use crate::types::{RawSeries, TimePoint};
use chrono::{DateTime, Duration, NaiveDate};
use serde::Deserialize;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) btc-predictor";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

/// Each field lines up with `ChartResult::timestamp`; gaps come back as null
#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct YahooSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl YahooSource {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PredictorError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<String> {
        // period2 is exclusive, so ask for the day after `end`
        let period1 = unix_midnight(start)?;
        let period2 = unix_midnight(end + Duration::days(1))?;

        Ok(format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, period1, period2
        ))
    }
}

impl MarketDataSource for YahooSource {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<RawSeries> {
        let url = self.chart_url(symbol, start, end)?;
        log::debug!("Fetching candles from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| PredictorError::Fetch(format!("Request failed: {}", e)))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| PredictorError::Fetch(format!("Failed to read response: {}", e)))?;

        let series = decode_chart(&body).map_err(|e| match e {
            PredictorError::Fetch(msg) if !status.is_success() => {
                PredictorError::Fetch(format!("HTTP {}: {}", status, msg))
            }
            other => other,
        })?;

        log::info!("Fetched {} daily candles for {}", series.len(), symbol);
        require_range(series, symbol, start, end)
    }
}

fn unix_midnight(date: NaiveDate) -> Result<i64> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| PredictorError::Validation(format!("Invalid date {}", date)))
}

/// Decode a chart payload, skipping candles with any missing value
fn decode_chart(body: &str) -> Result<RawSeries> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| PredictorError::Fetch(format!("Failed to parse response: {}", e)))?;

    if let Some(error) = response.chart.error {
        return Err(PredictorError::Fetch(format!(
            "{}: {}",
            error.code, error.description
        )));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(RawSeries::default());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let value = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let points: Vec<TimePoint> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &secs)| {
            Some(TimePoint {
                timestamp: DateTime::from_timestamp(secs, 0)?.date_naive(),
                open: value(&quote.open, i)?,
                high: value(&quote.high, i)?,
                low: value(&quote.low, i)?,
                close: value(&quote.close, i)?,
                volume: value(&quote.volume, i)?,
            })
        })
        .collect();

    let skipped = result.timestamp.len() - points.len();
    if skipped > 0 {
        log::warn!("Skipped {} incomplete candles", skipped);
    }

    RawSeries::from_unordered(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "BTC-USD"},
                "timestamp": [1704067200, 1704153600, 1704240000, 1704240000],
                "indicators": {
                    "quote": [{
                        "open":   [42000.0, 44000.0, null,    45500.0],
                        "high":   [44500.0, 45000.0, 46000.0, 46500.0],
                        "low":    [41800.0, 43500.0, 44000.0, 45000.0],
                        "close":  [44100.0, 44900.0, 45800.0, 46000.0],
                        "volume": [1.0e10,  1.1e10,  1.2e10,  1.3e10]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_decode_skips_nulls_and_duplicates() {
        let series = decode_chart(PAYLOAD).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(
            series.first().unwrap().timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(series.last().unwrap().close, 46000.0);
    }

    #[test]
    fn test_decode_api_error() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        assert!(matches!(decode_chart(body), Err(PredictorError::Fetch(_))));
    }

    #[test]
    fn test_decode_garbage_is_fetch_error() {
        assert!(matches!(decode_chart("<html>"), Err(PredictorError::Fetch(_))));
    }

    #[test]
    fn test_chart_url_makes_end_inclusive() {
        let source = YahooSource::new("https://example.com/", 5).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let url = source.chart_url("BTC-USD", start, end).unwrap();
        assert_eq!(
            url,
            "https://example.com/v8/finance/chart/BTC-USD?period1=1704067200&period2=1704240000&interval=1d"
        );
    }
}
