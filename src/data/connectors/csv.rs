use super::{
    source::{require_range, MarketDataSource},
    types::{RequiredColumn, DATE_ALIASES},
    validator::{DataValidator, OhlcvColumns},
};
use crate::error::{PredictorError, Result};
use crate::types::{RawSeries, TimePoint};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::{Path, PathBuf};

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| PredictorError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a CSV file and resolve its OHLCV columns
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<(DataFrame, OhlcvColumns)> {
        let df = Self::load(&path)?;
        let columns = DataValidator::validate_ohlcv(&df)?;

        // Incomplete rows are skipped on conversion
        let nulls = DataValidator::null_counts(&df, &columns)?;
        if !nulls.is_empty() {
            log::warn!("Null values detected: {:?}", nulls);
        }

        Ok((df, columns))
    }

    /// Convert a validated frame with a date column into a series.
    ///
    /// Rows with a null date or price are skipped; duplicated dates keep the
    /// last row.
    pub fn to_series(df: &DataFrame, columns: &OhlcvColumns) -> Result<RawSeries> {
        let date_name = Self::find_date_column(df).ok_or_else(|| {
            PredictorError::DataLoading(format!(
                "Missing date column (tried aliases: {:?})",
                DATE_ALIASES
            ))
        })?;
        let dates = Self::parse_dates(df.column(date_name)?)?;

        let open = columns.values(df, RequiredColumn::Open)?;
        let high = columns.values(df, RequiredColumn::High)?;
        let low = columns.values(df, RequiredColumn::Low)?;
        let close = columns.values(df, RequiredColumn::Close)?;
        let volume = columns.values(df, RequiredColumn::Volume)?;

        let mut points = Vec::with_capacity(df.height());
        let mut skipped = 0usize;
        for i in 0..df.height() {
            match (dates[i], open[i], high[i], low[i], close[i], volume[i]) {
                (Some(timestamp), Some(open), Some(high), Some(low), Some(close), Some(volume)) => {
                    points.push(TimePoint {
                        timestamp,
                        open,
                        high,
                        low,
                        close,
                        volume,
                    })
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {} incomplete CSV rows", skipped);
        }

        RawSeries::from_unordered(points)
    }

    fn find_date_column(df: &DataFrame) -> Option<&'static str> {
        let columns = df.get_column_names();
        DATE_ALIASES
            .iter()
            .find(|&&alias| columns.iter().any(|col| col.as_str() == alias))
            .copied()
    }

    fn parse_dates(column: &Column) -> Result<Vec<Option<NaiveDate>>> {
        match column.dtype() {
            DataType::String => column
                .str()?
                .into_iter()
                .map(|value| value.map(parse_date_str).transpose())
                .collect(),
            DataType::Date | DataType::Datetime(_, _) => {
                let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
                    .ok_or_else(|| PredictorError::DataLoading("Invalid epoch".to_string()))?;
                let days = column.cast(&DataType::Date)?.cast(&DataType::Int32)?;
                Ok(days
                    .i32()?
                    .into_iter()
                    .map(|d| d.map(|d| epoch + Duration::days(d as i64)))
                    .collect())
            }
            other => Err(PredictorError::DataLoading(format!(
                "Date column '{}' has unsupported type {:?}",
                column.name(),
                other
            ))),
        }
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time of day
fn parse_date_str(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .map_err(|e| PredictorError::DataLoading(format!("Unparseable date '{}': {}", value, e)))
}

/// Market data read from a local OHLCV file
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MarketDataSource for CsvSource {
    fn name(&self) -> &str {
        "CSV"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<RawSeries> {
        log::info!("Loading {} from {}", symbol, self.path.display());

        let (df, columns) = CsvConnector::load_and_validate(&self.path)?;
        let series = CsvConnector::to_series(&df, &columns)?;

        require_range(series, symbol, start, end)
    }
}
