use super::panels::{LeftPanel, MainPanel, RightPanel};
use super::services::{ConfigBridge, PipelineRunner};
use super::state::AppState;
use crate::config::ConfigManager;
use std::path::PathBuf;
use std::time::Duration;

pub struct PredictorApp {
    state: AppState,
    config: ConfigManager,
    runner: Option<PipelineRunner>,
    left_panel: LeftPanel,
    main_panel: MainPanel,
    right_panel: RightPanel,
}

impl Default for PredictorApp {
    fn default() -> Self {
        Self::with_config(ConfigManager::new(), None)
    }
}

impl PredictorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ConfigManager, config_path: Option<PathBuf>) -> Self {
        Self::with_config(config, config_path)
    }

    fn with_config(config: ConfigManager, config_path: Option<PathBuf>) -> Self {
        let mut state = AppState::new();
        ConfigBridge::apply(&mut state, &config.get());
        state.config_path = config_path;

        Self {
            state,
            config,
            runner: None,
            left_panel: LeftPanel::new(),
            main_panel: MainPanel::new(),
            right_panel: RightPanel::new(),
        }
    }

    fn start_run(&mut self) {
        self.state.run_requested = false;

        let request = match ConfigBridge::to_run_request(&self.state) {
            Ok(request) => request,
            Err(e) => {
                self.state.set_error(e.to_string());
                return;
            }
        };

        let candidate = ConfigBridge::to_app_config(&self.state);
        if let Err(e) = self.config.update(|config| *config = candidate) {
            self.state.set_error(e.to_string());
            return;
        }

        match PipelineRunner::start(self.config.get(), request) {
            Ok(runner) => {
                self.runner = Some(runner);
                self.state.is_running = true;
            }
            Err(e) => self.state.set_error(e),
        }
    }

    fn poll_runner(&mut self) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };

        if let Some(result) = runner.try_get_results() {
            self.runner = None;
            self.state.is_running = false;
            match result {
                Ok(report) => self.state.set_report(report),
                Err(e) => self.state.set_error(e),
            }
        }
    }

    fn load_config(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Config", &["toml", "json"])
            .pick_file()
        else {
            return;
        };

        match self.config.load_from_file(&path) {
            Ok(()) => {
                ConfigBridge::apply(&mut self.state, &self.config.get());
                self.state.status_message = format!("Loaded {}", path.display());
                self.state.config_path = Some(path);
            }
            Err(e) => self.state.status_message = e.to_string(),
        }
    }

    fn save_config(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .set_file_name("btc-predictor.toml")
            .save_file()
        else {
            return;
        };

        let candidate = ConfigBridge::to_app_config(&self.state);
        let result = self
            .config
            .update(|config| *config = candidate)
            .and_then(|_| self.config.save_to_file(&path));

        self.state.status_message = match result {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => e.to_string(),
        };
    }
}

impl eframe::App for PredictorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_runner();
        if self.state.run_requested && self.runner.is_none() {
            self.start_run();
        }
        if self.runner.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Bitcoin Price Predictor");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Save Config").clicked() {
                        self.save_config();
                    }
                    if ui.button("Load Config").clicked() {
                        self.load_config();
                    }
                    if let Some(path) = &self.state.config_path {
                        ui.small(path.display().to_string());
                    }
                });
            });
        });

        // Left Panel - Configuration
        egui::SidePanel::left("left_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.left_panel.show(ui, &mut self.state);
                });
            });

        // Right Panel - Model Details
        egui::SidePanel::right("right_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.right_panel.show(ui, &self.state);
                });
            });

        // Central Panel - Charts
        egui::CentralPanel::default().show(ctx, |ui| {
            self.main_panel.show(ui, &mut self.state);
        });
    }
}
