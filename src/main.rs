mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use anyhow::Context;
use app::BikeDashApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env().context("loading dashboard configuration")?;
    log::info!("Using data directory {}", config.data_dir.display());

    // A failed load is shown in the window instead of the charts.
    let mut state = AppState::new(config);
    let data_dir = state.data_dir.clone();
    state.load(&data_dir);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Rental Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(BikeDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
