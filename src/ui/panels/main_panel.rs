use crate::ui::state::AppState;
use crate::ui::widgets::Charts;

pub struct MainPanel;

impl MainPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        ui.heading("Prediction Results");
        ui.separator();

        ui.label(&state.status_message);
        if let Some(error) = &state.last_error {
            ui.colored_label(egui::Color32::RED, error);
        }

        ui.separator();

        let (Some(report), Some(charts)) = (&state.report, &state.chart_data) else {
            ui.centered_and_justified(|ui| {
                ui.label("No results yet. Click 'Run Prediction' to start.");
            });
            return;
        };

        let metrics = &report.evaluation.metrics;
        ui.horizontal(|ui| {
            Self::metric_card(ui, "MSE", format!("{:.4}", metrics.mse));
            Self::metric_card(ui, "RMSE", format!("${:.2}", metrics.rmse));
            Self::metric_card(ui, "MAE", format!("${:.2}", metrics.mae));
            Self::metric_card(ui, "R²", format!("{:.4}", metrics.r2));
            Self::metric_card(ui, "Next Close", format!("${:.2}", report.next_close));
        });

        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.label("Price History");
            Charts::price(ui, charts);
            ui.add_space(8.0);

            ui.label("Actual vs Predicted (test set)");
            Charts::actual_vs_predicted(ui, charts);
            ui.add_space(8.0);

            ui.label(format!("Forecast ({} days)", report.forecast.len()));
            Charts::forecast(ui, charts);

            ui.collapsing("Forecast Values", |ui| {
                egui::Grid::new("forecast_table")
                    .striped(true)
                    .show(ui, |ui| {
                        ui.label("Date");
                        ui.label("Predicted Close");
                        ui.end_row();

                        for (date, value) in report.forecast.iter() {
                            ui.label(date.to_string());
                            ui.label(format!("${:.2}", value));
                            ui.end_row();
                        }
                    });
            });
        });
    }

    fn metric_card(ui: &mut egui::Ui, label: &str, value: String) {
        ui.group(|ui| {
            ui.vertical(|ui| {
                ui.small(label);
                ui.strong(value);
            });
        });
    }
}
