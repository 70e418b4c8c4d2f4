pub mod charts;
pub mod data_selector;

pub use charts::Charts;
pub use data_selector::DataSelector;
