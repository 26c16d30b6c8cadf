use eframe::egui;
use rusty_predict::PipelineConfig;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyPredictApp {
    pub state: AppState,
}

impl RustyPredictApp {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for RustyPredictApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll();
        if self.state.is_busy() {
            // Keep the spinner moving until the worker reports back.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: pipeline controls ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: statistics, scores, log ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |cols| {
                cols[0].heading("Dataset");
                panels::stats_table(&mut cols[0], &self.state);
                cols[1].heading("Models");
                panels::models_table(&mut cols[1], &self.state);
                plot::score_chart(&mut cols[1], &self.state);
            });
            ui.separator();
            ui.heading("Results");
            panels::results_log(ui, &self.state);
        });
    }
}
