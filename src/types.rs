use crate::error::{PredictorError, Result};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One day of OHLCV market data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub timestamp: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl TimePoint {
    fn values(&self) -> [(&'static str, f64); 5] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ]
    }
}

/// Time-ordered OHLCV series with unique, strictly ascending timestamps.
///
/// The invariants are checked once on construction; the series is read-only
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    points: Vec<TimePoint>,
}

impl RawSeries {
    pub fn new(points: Vec<TimePoint>) -> Result<Self> {
        for (i, point) in points.iter().enumerate() {
            for (name, value) in point.values() {
                if !value.is_finite() || value < 0.0 {
                    return Err(PredictorError::Validation(format!(
                        "Invalid {} value {} at {}",
                        name, value, point.timestamp
                    )));
                }
            }
            if i > 0 && points[i - 1].timestamp >= point.timestamp {
                return Err(PredictorError::Validation(format!(
                    "Timestamps must be strictly ascending: {} follows {}",
                    point.timestamp,
                    points[i - 1].timestamp
                )));
            }
        }

        Ok(Self { points })
    }

    /// Sort by timestamp and keep the last observation for duplicated dates
    /// before validating.
    pub fn from_unordered(mut points: Vec<TimePoint>) -> Result<Self> {
        points.sort_by_key(|p| p.timestamp);
        let mut deduped: Vec<TimePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.timestamp == point.timestamp => *last = point,
                _ => deduped.push(point),
            }
        }
        Self::new(deduped)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn timestamps(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first(&self) -> Option<&TimePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TimePoint> {
        self.points.last()
    }

    /// Gap between the last two observations, one day when there is no pair.
    pub fn cadence(&self) -> Duration {
        match self.points.as_slice() {
            [.., prev, last] => last.timestamp - prev.timestamp,
            _ => Duration::days(1),
        }
    }

    /// Observations with `start <= timestamp <= end`.
    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| p.timestamp >= start && p.timestamp <= end)
                .copied()
                .collect(),
        }
    }

    /// Last `n` observations (or all of them when shorter).
    pub fn tail(&self, n: usize) -> &[TimePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// OHLCV columns in row order; timestamps stay on the series side.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let column = |name: &str, f: fn(&TimePoint) -> f64| {
            Column::new(name.into(), self.points.iter().map(f).collect::<Vec<f64>>())
        };

        let df = DataFrame::new(vec![
            column("open", |p| p.open),
            column("high", |p| p.high),
            column("low", |p| p.low),
            column("close", |p| p.close),
            column("volume", |p| p.volume),
        ])?;

        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, close: f64) -> TimePoint {
        TimePoint {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10.0,
        }
    }

    #[test]
    fn test_rejects_unordered_timestamps() {
        let result = RawSeries::new(vec![point(2, 100.0), point(1, 101.0)]);
        assert!(matches!(result, Err(PredictorError::Validation(_))));
    }

    #[test]
    fn test_rejects_duplicate_timestamps() {
        let result = RawSeries::new(vec![point(1, 100.0), point(1, 101.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_negative_values() {
        let mut bad = point(1, 100.0);
        bad.volume = -1.0;
        assert!(RawSeries::new(vec![bad]).is_err());
    }

    #[test]
    fn test_from_unordered_sorts_and_keeps_last_duplicate() {
        let series =
            RawSeries::from_unordered(vec![point(3, 103.0), point(1, 101.0), point(3, 99.0)])
                .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![101.0, 99.0]);
    }

    #[test]
    fn test_cadence_and_window() {
        let series = RawSeries::new(vec![point(1, 1.0), point(3, 2.0), point(5, 3.0)]).unwrap();
        assert_eq!(series.cadence(), Duration::days(2));

        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(series.within(start, end).len(), 2);
        assert_eq!(series.tail(2).len(), 2);
        assert_eq!(series.tail(10).len(), 3);
    }

    #[test]
    fn test_to_dataframe_columns() {
        let series = RawSeries::new(vec![point(1, 100.0), point(2, 101.0)]).unwrap();
        let df = series.to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        let close = df.column("close").unwrap().f64().unwrap();
        assert_eq!(close.get(1), Some(101.0));
    }
}
