use eframe::egui;

use crate::config::AppConfig;
use crate::data::store::Session;
use crate::state::{AppState, Tab};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PowerLoggerApp {
    pub state: AppState,
}

impl PowerLoggerApp {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            state: AppState::new(config, Session::default()),
        }
    }
}

impl eframe::App for PowerLoggerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar, tabs, notice ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Metrics strip, recomputed every frame ----
        egui::TopBottomPanel::top("metrics").show(ctx, |ui| {
            ui.add_space(4.0);
            panels::metrics_strip(ui, self.state.session.table());
            ui.add_space(4.0);
        });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::InputTable => panels::input_tab(ui, &mut self.state),
            Tab::Visualization => plot::chart_tab(ui, &mut self.state),
            Tab::Export => panels::export_tab(ui, &mut self.state),
        });
    }
}
