use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};
use rusty_predict::training::encode::TaskType;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Model score chart (central panel)
// ---------------------------------------------------------------------------

/// Y-range that always fits the scores of `task`: percent correct for
/// classification, correlation for regression.
fn score_range(task: Option<TaskType>) -> (f64, f64) {
    match task {
        Some(TaskType::Regression) => (-1.0, 1.0),
        Some(TaskType::Classification) | None => (0.0, 100.0),
    }
}

/// Bar chart of cross-validated scores, one bar per candidate.
pub fn score_chart(ui: &mut Ui, state: &AppState) {
    if state.scores.is_empty() {
        ui.label("Train models to compare their scores.");
        return;
    }

    let (low, high) = score_range(state.task);
    Plot::new("score_chart")
        .legend(Legend::default())
        .height(220.0)
        .y_axis_label("Score")
        .include_y(low)
        .include_y(high)
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (idx, (name, score)) in state.scores.iter().enumerate() {
                let bar = Bar::new(idx as f64, *score).width(0.6).name(name);
                let chart = BarChart::new(vec![bar])
                    .name(name)
                    .color(state.colors.color_for(name));
                plot_ui.bar_chart(chart);
            }
        });
}
