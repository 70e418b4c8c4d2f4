mod csv;
mod source;
mod types;
mod validator;
mod yahoo;

pub use csv::{CsvConnector, CsvSource};
pub use source::{from_config, MarketDataSource};
pub use types::{DataPreview, DatasetMetadata, RequiredColumn, DATE_ALIASES};
pub use validator::{DataValidator, OhlcvColumns, RowIssue};
pub use yahoo::YahooSource;
