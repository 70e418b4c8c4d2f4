use crate::types::RawSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Required OHLCV columns for market data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredColumn {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl RequiredColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::Open,
            Self::High,
            Self::Low,
            Self::Close,
            Self::Volume,
        ]
    }

    /// Common alternative column names
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Open => vec!["open", "Open", "OPEN", "o"],
            Self::High => vec!["high", "High", "HIGH", "h"],
            Self::Low => vec!["low", "Low", "LOW", "l"],
            Self::Close => vec!["close", "Close", "CLOSE", "c"],
            Self::Volume => vec!["volume", "Volume", "VOLUME", "vol", "Vol", "v"],
        }
    }
}

/// Date column names accepted by the CSV source
pub const DATE_ALIASES: [&str; 7] = [
    "date", "Date", "DATE", "datetime", "Datetime", "timestamp", "time",
];

/// Summary of a fetched series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub source: String,
    pub num_rows: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub price_range: (f64, f64),  // (min, max) of close
    pub volume_range: (f64, f64), // (min, max)
}

/// Data preview for UI display
#[derive(Debug, Clone)]
pub struct DataPreview {
    pub metadata: DatasetMetadata,
    pub columns: Vec<String>,
    pub last_rows: Vec<Vec<String>>,
}

impl DataPreview {
    /// Metadata plus the last `rows` observations rendered as strings
    pub fn from_series(source: &str, series: &RawSeries, rows: usize) -> Self {
        let closes = series.closes();
        let volumes: Vec<f64> = series.points().iter().map(|p| p.volume).collect();

        let metadata = DatasetMetadata {
            source: source.to_string(),
            num_rows: series.len(),
            date_range: series
                .first()
                .zip(series.last())
                .map(|(first, last)| (first.timestamp, last.timestamp)),
            price_range: min_max(&closes),
            volume_range: min_max(&volumes),
        };

        let last_rows = series
            .tail(rows)
            .iter()
            .map(|p| {
                vec![
                    p.timestamp.to_string(),
                    format!("{:.2}", p.open),
                    format!("{:.2}", p.high),
                    format!("{:.2}", p.low),
                    format!("{:.2}", p.close),
                    format!("{:.0}", p.volume),
                ]
            })
            .collect();

        Self {
            metadata,
            columns: ["date", "open", "high", "low", "close", "volume"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            last_rows,
        }
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimePoint;

    #[test]
    fn test_preview_uses_last_rows() {
        let points = (1..=8)
            .map(|d| TimePoint {
                timestamp: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
                open: 10.0,
                high: 12.0,
                low: 9.0,
                close: 10.0 + d as f64,
                volume: 100.0 * d as f64,
            })
            .collect();
        let series = RawSeries::new(points).unwrap();

        let preview = DataPreview::from_series("test", &series, 5);
        assert_eq!(preview.last_rows.len(), 5);
        assert_eq!(preview.last_rows[4][0], "2024-03-08");
        assert_eq!(preview.metadata.price_range, (11.0, 18.0));
        assert_eq!(preview.metadata.volume_range, (100.0, 800.0));
    }

    #[test]
    fn test_preview_of_empty_series() {
        let preview = DataPreview::from_series("empty", &RawSeries::default(), 5);
        assert!(preview.last_rows.is_empty());
        assert!(preview.metadata.date_range.is_none());
    }
}
