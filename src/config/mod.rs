pub mod traits;
pub mod data_source;
pub mod ml;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use data_source::{DataProvider, DataSourceConfig};
pub use ml::{FeatureConfig, ForecastConfig, SplitConfig, MAX_HORIZON};
pub use traits::{ConfigManifest, ConfigSection, FieldManifest};
