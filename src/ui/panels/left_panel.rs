use crate::config::{ConfigSection, FeatureConfig, ForecastConfig, SplitConfig};
use crate::ml::LabelPolicy;
use crate::ui::state::AppState;
use crate::ui::widgets::DataSelector;

pub struct LeftPanel;

impl LeftPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        ui.heading("Configuration");
        ui.separator();

        // 1. Data Source Section
        ui.collapsing("Data Source", |ui| {
            DataSelector::show(ui, state);
        });

        ui.separator();

        // 2. Date Range & Forecast Section
        egui::CollapsingHeader::new("Date Range & Forecast")
            .default_open(true)
            .show(ui, |ui| {
                Self::show_dates(ui, state);
            });

        ui.separator();

        // 3. Feature Section
        ui.collapsing("Features", |ui| {
            Self::show_features(ui, state);
        });

        ui.separator();

        // 4. Train/Test Split Section
        ui.collapsing("Train/Test Split", |ui| {
            Self::show_split(ui, state);
        });

        ui.separator();

        // 5. Control Buttons
        Self::show_control_buttons(ui, state);
    }

    fn show_dates(ui: &mut egui::Ui, state: &mut AppState) {
        ui.horizontal(|ui| {
            ui.label("Start:");
            ui.add(egui::TextEdit::singleline(&mut state.start_date).desired_width(100.0));
        });
        ui.horizontal(|ui| {
            ui.label("End:");
            ui.add(egui::TextEdit::singleline(&mut state.end_date).desired_width(100.0));
        });

        let manifest = ForecastConfig::default().to_manifest();
        let (min, max) = manifest
            .field("horizon")
            .map(|f| f.bounds_or(1.0, 30.0))
            .unwrap_or((1.0, 30.0));
        ui.horizontal(|ui| {
            ui.label("Horizon:");
            ui.add(
                egui::Slider::new(&mut state.forecast.horizon, min as usize..=max as usize)
                    .suffix(" days"),
            );
        });
    }

    fn show_features(ui: &mut egui::Ui, state: &mut AppState) {
        let manifest = FeatureConfig::default().to_manifest();
        let bounds = |name: &str, min: f64, max: f64| {
            manifest
                .field(name)
                .map(|f| f.bounds_or(min, max))
                .unwrap_or((min, max))
        };

        let (short_min, short_max) = bounds("short_window", 2.0, 14.0);
        ui.horizontal(|ui| {
            ui.label("Short MA:");
            ui.add(egui::Slider::new(
                &mut state.features.short_window,
                short_min as usize..=short_max as usize,
            ));
        });

        let (long_min, long_max) = bounds("long_window", 10.0, 60.0);
        ui.horizontal(|ui| {
            ui.label("Long MA:");
            ui.add(egui::Slider::new(
                &mut state.features.long_window,
                long_min as usize..=long_max as usize,
            ));
        });

        ui.checkbox(&mut state.features.include_volatility, "Volatility");
        ui.checkbox(&mut state.features.include_volume, "Volume");

        ui.horizontal(|ui| {
            ui.label("Target:");
            egui::ComboBox::from_id_salt("label_policy")
                .selected_text(state.features.label_policy.label())
                .show_ui(ui, |ui| {
                    for policy in [LabelPolicy::NextDay, LabelPolicy::SameDay] {
                        ui.selectable_value(&mut state.features.label_policy, policy, policy.label());
                    }
                });
        });

        if state.features.label_policy == LabelPolicy::SameDay {
            ui.colored_label(
                egui::Color32::YELLOW,
                "Same-day features include the close being predicted",
            );
        }
    }

    fn show_split(ui: &mut egui::Ui, state: &mut AppState) {
        let manifest = SplitConfig::default().to_manifest();
        let (min, max) = manifest
            .field("test_fraction")
            .map(|f| f.bounds_or(0.05, 0.5))
            .unwrap_or((0.05, 0.5));

        ui.horizontal(|ui| {
            ui.label("Test Size:");
            ui.add(egui::Slider::new(&mut state.split.test_fraction, min..=max).step_by(0.05));
        });

        ui.checkbox(&mut state.split.chronological, "Chronological");

        if !state.split.chronological {
            let mut seeded = state.split.seed.is_some();
            ui.horizontal(|ui| {
                ui.checkbox(&mut seeded, "Seed:");
                let mut seed = state.split.seed.unwrap_or(42);
                ui.add_enabled(seeded, egui::DragValue::new(&mut seed));
                state.split.seed = seeded.then_some(seed);
            });
        }
    }

    fn show_control_buttons(ui: &mut egui::Ui, state: &mut AppState) {
        ui.vertical_centered(|ui| {
            let validation_error = Self::validate_config(state).err();
            let can_run = validation_error.is_none() && !state.is_running;

            let run_button = ui.add_enabled(can_run, egui::Button::new("▶ Run Prediction"));
            if run_button.clicked() {
                state.run_requested = true;
                state.status_message = "Fetching data...".to_string();
                // The actual start will be handled in app.rs
            }

            if let Some(error) = validation_error {
                ui.colored_label(egui::Color32::RED, error);
            }

            if state.is_running {
                ui.spinner();
            }
        });
    }

    fn validate_config(state: &AppState) -> Result<(), String> {
        state.data.validate().map_err(|e| e.to_string())?;
        state.features.validate().map_err(|e| e.to_string())?;
        state.split.validate().map_err(|e| e.to_string())?;
        state.forecast.validate().map_err(|e| e.to_string())?;
        Ok(())
    }
}
