mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::JobLensApp;
use clap::Parser;
use config::{Cli, Config};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::from(Cli::parse());
    log::debug!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "JobLens – Explore Skills by Job Title",
        options,
        Box::new(move |cc| {
            // Black highlight markers need a light background.
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(JobLensApp::new(&config)))
        }),
    )
}
