use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{calculator, charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct BauDashApp {
    pub state: AppState,
}

impl eframe::App for BauDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar / view switch ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters (dashboard only) ----
        if self.state.view == View::Dashboard {
            egui::SidePanel::left("filter_panel")
                .default_width(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Dashboard => charts::dashboard(ui, &self.state),
            View::Calculator => calculator::calculator_view(ui, &mut self.state),
        });
    }
}
