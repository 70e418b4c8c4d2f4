//! Chart-ready views of a pipeline report. Pure data, no drawing.

use crate::ml::FeatureImportance;
use crate::pipeline::PipelineReport;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl LineSeries {
    pub fn new(name: &str, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            name: name.to_string(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub candles: Vec<Candle>,
    pub ma_short: LineSeries,
    pub ma_long: LineSeries,
    pub actual: LineSeries,
    pub predicted: LineSeries,
    /// Recent closes the forecast continues from
    pub history: LineSeries,
    pub forecast: LineSeries,
    /// Largest first
    pub importances: Vec<FeatureImportance>,
}

/// Closes shown ahead of the forecast overlay
const HISTORY_TAIL: usize = 60;

impl ChartData {
    pub fn from_report(report: &PipelineReport) -> Self {
        let candles = report
            .series
            .points()
            .iter()
            .map(|p| Candle {
                date: p.timestamp,
                open: p.open,
                high: p.high,
                low: p.low,
                close: p.close,
            })
            .collect();

        let overlay = |name: &str, value: fn(&crate::ml::FeatureRow) -> f64| {
            LineSeries::new(
                name,
                report
                    .feature_rows
                    .iter()
                    .map(|row| (row.timestamp, value(row)))
                    .collect(),
            )
        };

        let evaluation = &report.evaluation;
        let paired = |values: &[f64]| -> Vec<(NaiveDate, f64)> {
            evaluation
                .timestamps
                .iter()
                .copied()
                .zip(values.iter().copied())
                .collect()
        };

        let history = report
            .series
            .tail(HISTORY_TAIL)
            .iter()
            .map(|p| (p.timestamp, p.close))
            .collect();

        Self {
            candles,
            ma_short: overlay("Short MA", |row| row.ma_short),
            ma_long: overlay("Long MA", |row| row.ma_long),
            actual: LineSeries::new("Actual", paired(&evaluation.actual)),
            predicted: LineSeries::new("Predicted", paired(&evaluation.predicted)),
            history: LineSeries::new("Close", history),
            forecast: LineSeries::new("Forecast", report.forecast.iter().collect()),
            importances: report.ranked_importances(),
        }
    }
}

/// Data-space extent shared by everything drawn in one chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub min: f64,
    pub max: f64,
}

impl ChartBounds {
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut iter = points.into_iter().filter(|(_, v)| v.is_finite());
        let (date, value) = iter.next()?;
        let mut bounds = Self {
            start: date,
            end: date,
            min: value,
            max: value,
        };
        for (date, value) in iter {
            bounds.include(date, value);
        }
        Some(bounds)
    }

    pub fn include(&mut self, date: NaiveDate, value: f64) {
        self.start = self.start.min(date);
        self.end = self.end.max(date);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Horizontal position in `[0, 1]`
    pub fn x_fraction(&self, date: NaiveDate) -> f32 {
        let span = (self.end - self.start).num_days();
        if span <= 0 {
            return 0.5;
        }
        ((date - self.start).num_days() as f64 / span as f64) as f32
    }

    /// Vertical position in `[0, 1]`, 0 at the bottom
    pub fn y_fraction(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.5;
        }
        ((value - self.min) / span) as f32
    }
}
