use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::{AppState, Job};

// ---------------------------------------------------------------------------
// Left side panel – pipeline controls
// ---------------------------------------------------------------------------

/// Render the left control panel: file, target column and the step buttons.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Analysis");
    ui.separator();

    // ---- 1. Data file ----
    ui.strong("1. Select Data File");
    ui.horizontal(|ui: &mut Ui| {
        ui.add(egui::TextEdit::singleline(&mut state.file_path).desired_width(150.0));
        if ui.add_enabled(!state.is_busy(), egui::Button::new("Browse…")).clicked() {
            open_file_dialog(state);
        }
    });
    let can_load = !state.is_busy() && !state.file_path.trim().is_empty();
    if ui.add_enabled(can_load, egui::Button::new("Load Data")).clicked() {
        let path = PathBuf::from(state.file_path.trim());
        state.start(Job::Load(path), ui.ctx());
    }
    ui.add_space(8.0);

    // ---- 2. Target column ----
    ui.strong("2. Select Target Column");
    let selected = state.target.clone().unwrap_or_default();
    ui.add_enabled_ui(!state.is_busy() && !state.columns.is_empty(), |ui: &mut Ui| {
        egui::ComboBox::from_id_salt("target_column")
            .selected_text(&selected)
            .show_ui(ui, |ui: &mut Ui| {
                for col in &state.columns {
                    if ui.selectable_label(selected == *col, col).clicked() {
                        state.target = Some(col.clone());
                    }
                }
            });
    });
    ui.add_space(8.0);

    // ---- 3. Steps ----
    ui.strong("3. Run Analysis");
    if ui.add_enabled(state.can_clean(), egui::Button::new("Clean Data")).clicked() {
        state.start(Job::Clean, ui.ctx());
    }
    if ui.add_enabled(state.can_train(), egui::Button::new("Train Models")).clicked() {
        if let Some(target) = state.target.clone() {
            state.start(Job::Train { target }, ui.ctx());
        }
    }
    if ui.add_enabled(state.can_report(), egui::Button::new("Generate Report")).clicked() {
        state.start(Job::Report, ui.ctx());
    }

    if let Some(best) = &state.best_model {
        ui.add_space(8.0);
        ui.separator();
        ui.strong("Best Model");
        ui.label(RichText::new(best).color(Color32::LIGHT_GREEN));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.add_enabled(!state.is_busy(), egui::Button::new("Open…")).clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();
        ui.label(format!("Stage: {}", state.stage));
        if state.is_busy() {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – tables and results log
// ---------------------------------------------------------------------------

/// Dataset statistics as a two-column table.
pub fn stats_table(ui: &mut Ui, state: &AppState) {
    if state.stats.is_empty() {
        ui.label("No dataset loaded.");
        return;
    }
    ui.push_id("stats_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(140.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Statistic");
                });
                header.col(|ui| {
                    ui.strong("Value");
                });
            })
            .body(|mut body| {
                for (label, value) in state.stats.iter() {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(label);
                        });
                        row.col(|ui| {
                            ui.label(value);
                        });
                    });
                }
            });
    });
}

/// One row per candidate with its metrics summary.
pub fn models_table(ui: &mut Ui, state: &AppState) {
    if state.summaries.is_empty() {
        return;
    }
    ui.push_id("models_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(180.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Model");
                });
                header.col(|ui| {
                    ui.strong("Metrics");
                });
            })
            .body(|mut body| {
                for (name, summary) in &state.summaries {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(RichText::new(name).color(state.colors.color_for(name)));
                        });
                        row.col(|ui| {
                            ui.label(summary);
                        });
                    });
                }
            });
    });
}

/// Scrolling log of everything the jobs reported.
pub fn results_log(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .id_salt("results_log")
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui: &mut Ui| {
            for line in &state.log {
                ui.monospace(line);
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open data file")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Selected {}", path.display());
        state.file_path = path.display().to_string();
    }
}
