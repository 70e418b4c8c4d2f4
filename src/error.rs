use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("No data available: {0}")]
    DataUnavailable(String),

    #[error("Error fetching data: {0}")]
    Fetch(String),

    #[error("Insufficient data: {rows} labeled rows, minimum {required} required")]
    InsufficientData { rows: usize, required: usize },

    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    #[error("Degenerate regression input: {0}")]
    DegenerateInput(String),

    #[error("Insufficient history: {available} observations, {required} required for a {horizon}-day forecast")]
    InsufficientHistory {
        available: usize,
        required: usize,
        horizon: usize,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PredictorError>;
