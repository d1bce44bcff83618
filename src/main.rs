use clap::Parser;
use eframe::egui;

use cars_dashboard::app::DashboardApp;
use cars_dashboard::config::{Cli, DashboardConfig, init_logger};
use cars_dashboard::content::APP_TITLE;
use cars_dashboard::state::AppState;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = DashboardConfig::from_cli(&cli)?;
    log::info!(
        "Raw data: {}, cleaned data: {}",
        config.raw_path.display(),
        config.cleaned_path.display()
    );

    // Both tables must load before the window opens.
    let state = match AppState::load(config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to load datasets: {e:#}");
            return Err(e.context("loading datasets"));
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
