//! CsvSleuth: galactic spend report analyser.
//!
//! Thin binary entry point. All logic lives in the `csvsleuth-core`
//! and `csvsleuth-gui` crates.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use csvsleuth_core::{AppConfig, JsonFileStorage, SharedStorage};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialise structured logging. `RUST_LOG` overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("CsvSleuth starting");

    let config = AppConfig::from_env();
    tracing::info!("History file: {}", config.history_path.display());
    let storage: SharedStorage = Arc::new(JsonFileStorage::new(config.history_path.clone()));

    let state = csvsleuth_gui::CsvSleuthState::build(&config, storage);
    let icon = csvsleuth_gui::icon::generate_icon(64);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("CsvSleuth -- Galactic Spend Analyser")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 480.0])
            .with_icon(icon)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "CsvSleuth",
        options,
        Box::new(|cc| {
            Ok(Box::new(csvsleuth_gui::CsvSleuthApp::with_state(
                cc, state,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
