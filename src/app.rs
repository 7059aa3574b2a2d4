use eframe::egui;

use crate::config::Config;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct JobLensApp {
    pub state: AppState,
}

impl JobLensApp {
    /// Build the app and read the configured data file once.
    pub fn new(config: &Config) -> Self {
        let mut state = AppState::new(config);
        state.load_path(&config.data_path);
        Self { state }
    }
}

impl eframe::App for JobLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // A failed load halts the dashboard; only the message is shown.
        if self.state.load_error.is_none() {
            // ---- Left side panel: title picker and cluster summary ----
            egui::SidePanel::left("cluster_panel")
                .default_width(320.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: scatter plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::cluster_plot(ui, &self.state);
        });
    }
}
