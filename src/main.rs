use std::path::PathBuf;

use baudash::app::BauDashApp;
use baudash::data::loader;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional dataset path on the command line, loaded before the first
    // frame. A failed startup load is fatal.
    let startup_file: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "BauDash – Construction Materials",
        options,
        Box::new(move |_cc| {
            let mut app = BauDashApp::default();
            if let Some(path) = startup_file {
                match loader::load_file(&path) {
                    Ok(table) => {
                        log::info!(
                            "Loaded {} records from {} with columns {:?}",
                            table.len(),
                            path.display(),
                            table.column_names
                        );
                        app.state.set_table(table);
                    }
                    Err(e) => {
                        log::error!("Failed to load {}: {e:#}", path.display());
                        return Err(format!("cannot load {}: {e:#}", path.display()).into());
                    }
                }
            }
            Ok(Box::new(app))
        }),
    )
}
