pub mod connectors;

pub use connectors::{
    from_config, CsvConnector, CsvSource, DataPreview, DatasetMetadata, MarketDataSource,
    YahooSource,
};
