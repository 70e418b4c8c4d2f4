#![allow(dead_code)]

use btc_predictor::data::MarketDataSource;
use btc_predictor::types::{RawSeries, TimePoint};
use btc_predictor::{PredictorError, Result};
use chrono::{Duration, NaiveDate};

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Daily closes `start + step * i` with a volume that never stays constant
pub fn linear_series(n: usize, start: f64, step: f64) -> RawSeries {
    series_from_closes(&(0..n).map(|i| start + step * i as f64).collect::<Vec<_>>())
}

/// Upward drift with a wave on top, so no feature is an exact function of another
pub fn wavy_series(n: usize) -> RawSeries {
    let closes: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.5 * t + 5.0 * (t * 0.7).sin() + 2.0 * (t * 0.23).cos()
        })
        .collect();
    series_from_closes(&closes)
}

pub fn series_from_closes(closes: &[f64]) -> RawSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| TimePoint {
            timestamp: start_date() + Duration::days(i as i64),
            open: close,
            high: close + 2.0,
            low: (close - 2.0).max(0.0),
            close,
            volume: 1000.0 + ((i * 7) % 11) as f64 * 25.0,
        })
        .collect();
    RawSeries::new(points).unwrap()
}

/// Serves a fixed series, honouring the requested range
pub struct InMemorySource {
    pub series: RawSeries,
}

impl MarketDataSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<RawSeries> {
        let ranged = self.series.within(start, end);
        if ranged.is_empty() {
            return Err(PredictorError::DataUnavailable(format!(
                "{} has no rows between {} and {}",
                symbol, start, end
            )));
        }
        Ok(ranged)
    }
}
