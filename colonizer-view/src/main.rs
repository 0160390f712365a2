//! Application entry point for the space-colonization viewer.
//!
//! This binary sets up logging and eframe/egui, then delegates all
//! interaction and rendering to [`Viewer`] from the `viewer` module.

mod shift;
mod viewer;

use colonizer_core::Config;
use viewer::Viewer;

/// Loads a growth config from the JSON file named by the first argument.
///
/// Parameters are derived from the window size when no path is given or
/// the file cannot be used.
fn config_override() -> Option<Config> {
    let path = std::env::args().nth(1)?;
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            log::error!("cannot read {path}: {err}");
            return None;
        }
    };
    match Config::from_json_str(&text) {
        Ok(cfg) => {
            log::info!("loaded growth config from {path}");
            Some(cfg)
        }
        Err(err) => {
            log::error!("ignoring {path}: {err}");
            None
        }
    }
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = config_override();
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Colonizer",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(cfg)?))),
    )
}
