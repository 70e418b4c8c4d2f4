//! Column resolution and per-row checks for OHLCV frames.
//!
//! A frame passes when every complete row could become a `TimePoint` and
//! describes a well-formed candle. Rows with nulls are left for the caller
//! to skip.

use super::types::RequiredColumn;
use crate::error::{PredictorError, Result};
use polars::prelude::*;
use std::fmt;

/// Frame column backing each OHLCV field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OhlcvColumns {
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl OhlcvColumns {
    /// First alias present in the frame wins
    pub fn resolve(df: &DataFrame) -> Result<Self> {
        let present = df.get_column_names();
        let lookup = |required: RequiredColumn| -> Result<String> {
            required
                .aliases()
                .into_iter()
                .find(|alias| present.iter().any(|name| name.as_str() == *alias))
                .map(String::from)
                .ok_or_else(|| {
                    PredictorError::DataLoading(format!(
                        "No {} column (expected one of {:?})",
                        required.as_str(),
                        required.aliases()
                    ))
                })
        };

        Ok(Self {
            open: lookup(RequiredColumn::Open)?,
            high: lookup(RequiredColumn::High)?,
            low: lookup(RequiredColumn::Low)?,
            close: lookup(RequiredColumn::Close)?,
            volume: lookup(RequiredColumn::Volume)?,
        })
    }

    pub fn name(&self, required: RequiredColumn) -> &str {
        match required {
            RequiredColumn::Open => &self.open,
            RequiredColumn::High => &self.high,
            RequiredColumn::Low => &self.low,
            RequiredColumn::Close => &self.close,
            RequiredColumn::Volume => &self.volume,
        }
    }

    /// One field widened to `f64`; nulls stay `None`
    pub fn values(&self, df: &DataFrame, required: RequiredColumn) -> Result<Vec<Option<f64>>> {
        let column = df.column(self.name(required))?;
        if !matches!(
            column.dtype(),
            DataType::Float64
                | DataType::Float32
                | DataType::Int64
                | DataType::Int32
                | DataType::Int16
                | DataType::UInt64
                | DataType::UInt32
                | DataType::UInt16
        ) {
            return Err(PredictorError::DataLoading(format!(
                "{} column '{}' is {:?}, expected a number",
                required.as_str(),
                column.name(),
                column.dtype()
            )));
        }

        let widened = column.cast(&DataType::Float64)?;
        Ok(widened.f64()?.into_iter().collect())
    }
}

/// Why a complete row was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowIssue {
    /// NaN, infinite or negative
    InvalidValue { field: RequiredColumn, value: f64 },
    HighBelowLow { high: f64, low: f64 },
    /// Open or close outside `[low, high]`
    BodyOutsideRange { open: f64, close: f64 },
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, value } => {
                write!(f, "{} must be a non-negative number, got {}", field.as_str(), value)
            }
            Self::HighBelowLow { high, low } => write!(f, "high {} is below low {}", high, low),
            Self::BodyOutsideRange { open, close } => {
                write!(f, "open {} / close {} fall outside the high-low range", open, close)
            }
        }
    }
}

pub struct DataValidator;

impl DataValidator {
    /// Resolve the OHLCV columns and reject the frame at its first bad row
    pub fn validate_ohlcv(df: &DataFrame) -> Result<OhlcvColumns> {
        let columns = OhlcvColumns::resolve(df)?;

        let open = columns.values(df, RequiredColumn::Open)?;
        let high = columns.values(df, RequiredColumn::High)?;
        let low = columns.values(df, RequiredColumn::Low)?;
        let close = columns.values(df, RequiredColumn::Close)?;
        let volume = columns.values(df, RequiredColumn::Volume)?;

        for row in 0..df.height() {
            let (Some(o), Some(h), Some(l), Some(c), Some(v)) =
                (open[row], high[row], low[row], close[row], volume[row])
            else {
                continue;
            };
            if let Some(issue) = Self::check_row(o, h, l, c, v) {
                return Err(PredictorError::DataLoading(format!("Row {}: {}", row, issue)));
            }
        }

        Ok(columns)
    }

    pub fn check_row(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Option<RowIssue> {
        let fields = [
            (RequiredColumn::Open, open),
            (RequiredColumn::High, high),
            (RequiredColumn::Low, low),
            (RequiredColumn::Close, close),
            (RequiredColumn::Volume, volume),
        ];
        if let Some(&(field, value)) = fields.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Some(RowIssue::InvalidValue { field, value });
        }

        if high < low {
            Some(RowIssue::HighBelowLow { high, low })
        } else if open.max(close) > high || open.min(close) < low {
            Some(RowIssue::BodyOutsideRange { open, close })
        } else {
            None
        }
    }

    /// Null count per OHLCV field, omitting fields without nulls
    pub fn null_counts(df: &DataFrame, columns: &OhlcvColumns) -> Result<Vec<(RequiredColumn, usize)>> {
        let mut counts = Vec::new();
        for required in RequiredColumn::all() {
            let nulls = df.column(columns.name(required))?.null_count();
            if nulls > 0 {
                counts.push((required, nulls));
            }
        }
        Ok(counts)
    }
}
