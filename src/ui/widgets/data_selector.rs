use crate::config::DataProvider;
use crate::ui::state::AppState;

pub struct DataSelector;

impl DataSelector {
    pub fn show(ui: &mut egui::Ui, state: &mut AppState) {
        ui.horizontal(|ui| {
            ui.label("Source:");
            egui::ComboBox::from_id_salt("data_provider")
                .selected_text(Self::provider_label(state.data.provider))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut state.data.provider, DataProvider::Yahoo, "Yahoo Finance");
                    ui.selectable_value(&mut state.data.provider, DataProvider::Csv, "CSV File");
                });
        });

        ui.horizontal(|ui| {
            ui.label("Symbol:");
            ui.text_edit_singleline(&mut state.data.symbol);
        });

        match state.data.provider {
            DataProvider::Yahoo => {
                ui.horizontal(|ui| {
                    ui.label("Timeout:");
                    ui.add(
                        egui::DragValue::new(&mut state.data.timeout_secs)
                            .suffix(" s")
                            .range(1..=300),
                    );
                });
            }
            DataProvider::Csv => {
                if ui.button("Select CSV File...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("CSV Files", &["csv"])
                        .pick_file()
                    {
                        state.status_message = format!("Using {}", path.display());
                        state.data.csv_path = Some(path);
                    }
                }

                match &state.data.csv_path {
                    Some(path) => {
                        ui.label(format!(
                            "File: {}",
                            path.file_name().unwrap_or_default().to_string_lossy()
                        ));
                    }
                    None => {
                        ui.colored_label(egui::Color32::YELLOW, "No file selected");
                    }
                }
            }
        }

        // Last rows of the most recent fetch
        if let Some(preview) = &state.data_preview {
            ui.collapsing("Preview", |ui| {
                ui.label(format!("Rows: {}", preview.metadata.num_rows));
                if let Some((first, last)) = preview.metadata.date_range {
                    ui.label(format!("Range: {} to {}", first, last));
                }
                let (low, high) = preview.metadata.price_range;
                ui.label(format!("Close: ${:.2} to ${:.2}", low, high));

                egui::Grid::new("data_preview_grid")
                    .striped(true)
                    .show(ui, |ui| {
                        for col_name in &preview.columns {
                            ui.label(col_name);
                        }
                        ui.end_row();

                        for row in &preview.last_rows {
                            for cell in row {
                                ui.label(cell);
                            }
                            ui.end_row();
                        }
                    });
            });
        }
    }

    fn provider_label(provider: DataProvider) -> &'static str {
        match provider {
            DataProvider::Yahoo => "Yahoo Finance",
            DataProvider::Csv => "CSV File",
        }
    }
}
