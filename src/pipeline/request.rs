use crate::config::MAX_HORIZON;
use crate::error::{PredictorError, Result};
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of the default lookback window
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// What the user asked for in one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub horizon: usize,
}

impl RunRequest {
    pub fn new(symbol: &str, start: NaiveDate, end: NaiveDate, horizon: usize) -> Self {
        Self {
            symbol: symbol.to_string(),
            start,
            end,
            horizon,
        }
    }

    /// The year of history ending today
    pub fn last_year(symbol: &str, horizon: usize) -> Self {
        let end = Local::now().date_naive();
        Self::new(symbol, end - Duration::days(DEFAULT_LOOKBACK_DAYS), end, horizon)
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(PredictorError::Validation("Symbol must not be empty".to_string()));
        }
        if self.start >= self.end {
            return Err(PredictorError::Validation(format!(
                "Start date {} must be before end date {}",
                self.start, self.end
            )));
        }
        if self.horizon < 1 || self.horizon > MAX_HORIZON {
            return Err(PredictorError::Validation(format!(
                "Forecast horizon {} must be between 1 and {} days",
                self.horizon, MAX_HORIZON
            )));
        }
        Ok(())
    }
}
