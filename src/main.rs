use std::path::Path;

use eframe::egui;
use fry_studio::{FryApp, FryConfig};

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Optional JSON config file as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => match FryConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Ignoring config {path}: {err}");
                FryConfig::default()
            }
        },
        None => FryConfig::default(),
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1000.0, 900.0])
        .with_min_inner_size([600.0, 500.0])
        .with_drag_and_drop(true);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Fry Studio",
        options,
        Box::new(|cc| Ok(Box::new(FryApp::new(cc, config)?))),
    )
}
