use crate::config::AppConfig;
use crate::data::from_config;
use crate::pipeline::{Pipeline, PipelineReport, RunRequest};
use std::thread::{self, JoinHandle};

/// Result from a background run, already rendered for the status line on failure
pub type RunResult = Result<PipelineReport, String>;

/// Runs one pipeline on a worker thread so the window keeps repainting
pub struct PipelineRunner {
    handle: Option<JoinHandle<RunResult>>,
}

impl PipelineRunner {
    pub fn start(config: AppConfig, request: RunRequest) -> Result<Self, String> {
        let handle = thread::Builder::new()
            .name("pipeline".to_string())
            .spawn(move || Self::run(config, request))
            .map_err(|e| format!("Failed to spawn pipeline thread: {}", e))?;

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Check if the run is complete and take its result
    pub fn try_get_results(&mut self) -> Option<RunResult> {
        let handle = self.handle.take()?;
        if handle.is_finished() {
            match handle.join() {
                Ok(result) => Some(result),
                Err(_) => Some(Err("Pipeline thread panicked".to_string())),
            }
        } else {
            self.handle = Some(handle);
            None
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    fn run(config: AppConfig, request: RunRequest) -> RunResult {
        let source = from_config(&config.data).map_err(|e| e.to_string())?;
        let result = Pipeline::from_config(&config).run(source.as_ref(), &request);

        if let Err(e) = &result {
            log::warn!("Run failed: {}", e);
        }
        result.map_err(|e| e.to_string())
    }
}
