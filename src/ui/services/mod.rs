pub mod chart_data;
pub mod config_bridge;
pub mod pipeline_runner;

pub use chart_data::{Candle, ChartBounds, ChartData, LineSeries};
pub use config_bridge::ConfigBridge;
pub use pipeline_runner::{PipelineRunner, RunResult};
