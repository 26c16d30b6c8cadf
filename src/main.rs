mod app;
mod color;
mod state;
mod ui;

use std::path::Path;

use app::RustyPredictApp;
use eframe::egui;
use rusty_predict::config::CONFIG_FILE;
use rusty_predict::PipelineConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = PipelineConfig::load_or_default(Path::new(CONFIG_FILE));
    log::info!("Using {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Predict – Predictive Analytics",
        options,
        Box::new(|_cc| Ok(Box::new(RustyPredictApp::new(config)))),
    )
}
