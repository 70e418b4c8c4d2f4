use crate::config::{DataSourceConfig, FeatureConfig, ForecastConfig, SplitConfig};
use crate::data::DataPreview;
use crate::pipeline::{PipelineReport, RunRequest};
use crate::ui::services::config_bridge::DATE_FORMAT;
use crate::ui::services::ChartData;
use std::path::PathBuf;

/// Rows shown in the data preview grid
pub const PREVIEW_ROWS: usize = 5;

/// Central application state for the UI
pub struct AppState {
    // Run Configuration
    pub data: DataSourceConfig,
    pub features: FeatureConfig,
    pub split: SplitConfig,
    pub forecast: ForecastConfig,
    pub start_date: String,
    pub end_date: String,
    pub config_path: Option<PathBuf>,

    // Execution State
    pub is_running: bool,
    pub run_requested: bool,
    pub status_message: String,
    pub last_error: Option<String>,

    // Results
    pub report: Option<PipelineReport>,
    pub chart_data: Option<ChartData>,
    pub data_preview: Option<DataPreview>,
}

impl Default for AppState {
    fn default() -> Self {
        let request = RunRequest::last_year("BTC-USD", ForecastConfig::default().horizon);

        Self {
            data: DataSourceConfig::default(),
            features: FeatureConfig::default(),
            split: SplitConfig::default(),
            forecast: ForecastConfig::default(),
            start_date: request.start.format(DATE_FORMAT).to_string(),
            end_date: request.end.format(DATE_FORMAT).to_string(),
            config_path: None,

            is_running: false,
            run_requested: false,
            status_message: "Ready".to_string(),
            last_error: None,

            report: None,
            chart_data: None,
            data_preview: None,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_report(&mut self, report: PipelineReport) {
        self.status_message = report.summary();
        self.last_error = None;
        self.chart_data = Some(ChartData::from_report(&report));
        self.data_preview = Some(DataPreview::from_series(
            &report.source,
            &report.series,
            PREVIEW_ROWS,
        ));
        self.report = Some(report);
    }

    /// A failed run leaves no charts or metrics behind
    pub fn set_error(&mut self, error: String) {
        self.status_message = "Run failed".to_string();
        self.last_error = Some(error);
        self.report = None;
        self.chart_data = None;
        self.data_preview = None;
    }
}
