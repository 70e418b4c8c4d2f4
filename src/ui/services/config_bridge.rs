use crate::config::AppConfig;
use crate::error::{PredictorError, Result};
use crate::pipeline::RunRequest;
use crate::ui::state::AppState;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct ConfigBridge;

impl ConfigBridge {
    /// Convert AppState to AppConfig
    pub fn to_app_config(state: &AppState) -> AppConfig {
        AppConfig {
            data: state.data.clone(),
            features: state.features.clone(),
            split: state.split.clone(),
            forecast: state.forecast.clone(),
        }
    }

    /// Copy a loaded configuration into the editable state
    pub fn apply(state: &mut AppState, config: &AppConfig) {
        state.data = config.data.clone();
        state.features = config.features.clone();
        state.split = config.split.clone();
        state.forecast = config.forecast.clone();
    }

    /// Parse the date fields and horizon into a run request
    pub fn to_run_request(state: &AppState) -> Result<RunRequest> {
        let request = RunRequest::new(
            &state.data.symbol,
            parse_date("start", &state.start_date)?,
            parse_date("end", &state.end_date)?,
            state.forecast.horizon,
        );
        request.validate()?;
        Ok(request)
    }
}

fn parse_date(field: &str, text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|_| {
        PredictorError::Validation(format!(
            "Invalid {} date '{}', expected YYYY-MM-DD",
            field, text
        ))
    })
}
