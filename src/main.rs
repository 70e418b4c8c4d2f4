use anyhow::Context;
use btc_predictor::config::ConfigManager;
use btc_predictor::ui::PredictorApp;
use eframe::NativeOptions;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Optional config file as the only argument
    let config = ConfigManager::new();
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    if let Some(path) = &config_path {
        config
            .load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
    }

    let native_options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("Bitcoin Price Predictor"),
        ..Default::default()
    };

    eframe::run_native(
        "Bitcoin Price Predictor",
        native_options,
        Box::new(move |cc| Ok(Box::new(PredictorApp::new(cc, config, config_path)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
}
