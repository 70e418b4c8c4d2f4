use crate::ui::state::AppState;
use crate::ui::widgets::Charts;

pub struct RightPanel;

impl RightPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &AppState) {
        ui.heading("Model Details");

        ui.separator();

        let Some(report) = &state.report else {
            ui.centered_and_justified(|ui| {
                ui.label("Run a prediction to view the fitted model");
            });
            return;
        };

        // Dataset Card
        ui.group(|ui| {
            ui.heading("Dataset");
            ui.horizontal(|ui| {
                ui.label("Source:");
                ui.label(&report.source);
            });
            ui.horizontal(|ui| {
                ui.label("Observations:");
                ui.label(format!("{}", report.series.len()));
            });
            ui.horizontal(|ui| {
                ui.label("Labeled Rows:");
                ui.label(format!("{}", report.labeled_rows));
            });
            ui.horizontal(|ui| {
                ui.label("Train / Test:");
                ui.label(format!("{} / {}", report.train_rows, report.test_rows));
            });
        });

        ui.separator();

        // Coefficients
        ui.group(|ui| {
            ui.heading("Coefficients");
            egui::Grid::new("coefficients_grid")
                .striped(true)
                .show(ui, |ui| {
                    ui.label("Intercept");
                    ui.label(format!("{:.6}", report.model.intercept));
                    ui.end_row();

                    for (name, coefficient) in report.feature_names.iter().zip(&report.model.coefficients) {
                        ui.label(name);
                        ui.label(format!("{:.6}", coefficient));
                        ui.end_row();
                    }
                });

            if report.model.rank < report.model.n_features() {
                ui.colored_label(
                    egui::Color32::YELLOW,
                    format!(
                        "Rank {} of {}: collinear features were given zero weight",
                        report.model.rank,
                        report.model.n_features()
                    ),
                );
            }
        });

        ui.separator();

        ui.group(|ui| {
            ui.heading("Feature Importance");
            ui.small("|coefficient|, sensitive to feature scale");
            if let Some(charts) = &state.chart_data {
                Charts::importance(ui, &charts.importances);
            }
        });
    }
}
