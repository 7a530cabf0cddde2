/// Bottom status bar: analysis phase, history size and the last storage error.
use crate::state::{status_label, AppState};
use crate::theme::Palette;
use csvsleuth_core::model::format::format_count;
use csvsleuth_core::AnalysisStatus;
use egui::Ui;

/// Draw the status bar at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &mut AppState) {
    let palette = Palette::for_visuals(ui.visuals());
    let color_normal = ui.visuals().text_color();

    ui.horizontal(|ui| {
        let status = state.workflow.status();
        let color = match status {
            AnalysisStatus::Idle => palette.muted,
            AnalysisStatus::Processing => color_normal,
            AnalysisStatus::Completed => palette.success,
            AnalysisStatus::Error => palette.error,
        };
        if status == AnalysisStatus::Processing {
            ui.spinner();
        }
        ui.label(egui::RichText::new(status_label(status)).size(12.0).color(color));

        if let Some(file) = state.workflow.file() {
            ui.separator();
            ui.label(
                egui::RichText::new(truncate_name(&file.name, 48))
                    .size(12.0)
                    .color(color_normal),
            );
        }

        if let Some(h) = state.workflow.highlights() {
            ui.separator();
            ui.label(
                egui::RichText::new(format!("{} rows", format_count(h.rows_affected)))
                    .size(12.0)
                    .color(palette.accent),
            );
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if state.storage_error.is_some()
                && ui.small_button("✕").on_hover_text("Dismiss").clicked()
            {
                state.dismiss_storage_error();
            }
            if let Some(message) = &state.storage_error {
                ui.label(
                    egui::RichText::new(format!("⚠ {message}"))
                        .size(12.0)
                        .color(palette.warning),
                );
            } else if !state.history.is_empty() {
                ui.label(
                    egui::RichText::new(format!("{} in history", state.history.len()))
                        .size(12.0)
                        .color(palette.muted),
                );
            }
        });
    });
}

/// Truncate a file name to `max_len` characters, replacing the middle with
/// "..." if needed.
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        return name.to_string();
    }
    let half = (max_len - 3) / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::truncate_name;

    #[test]
    fn short_names_are_untouched() {
        assert_eq!(truncate_name("report.csv", 20), "report.csv");
    }

    #[test]
    fn long_names_keep_both_ends() {
        let out = truncate_name("a_very_long_galactic_spend_report_2024.csv", 21);
        assert_eq!(out, "a_very_lo..._2024.csv");
    }
}
