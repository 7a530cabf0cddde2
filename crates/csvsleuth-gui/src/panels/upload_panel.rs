/// Upload page: file selection, submission, progress and results.
use crate::state::AppState;
use crate::theme::Palette;
use crate::widgets::highlights::highlight_grid;
use csvsleuth_core::model::format::format_count;
use csvsleuth_core::AnalysisStatus;
use egui::Ui;

/// Draw the upload page.
pub fn upload_panel(ui: &mut Ui, state: &mut AppState) {
    let palette = Palette::for_visuals(ui.visuals());
    let processing = state.workflow.is_processing();

    ui.heading("Analyse a spend report");
    ui.add_space(8.0);

    // ── Drop zone ─────────────────────────────────────────────────────
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            let prompt = match state.workflow.file() {
                Some(file) => format!("📄 {}", file.name),
                None => "Drop a .csv file here, or enter its path below".to_string(),
            };
            ui.label(egui::RichText::new(prompt).size(15.0));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let edit = ui.add_enabled(
                    !processing,
                    egui::TextEdit::singleline(&mut state.path_input)
                        .hint_text("/path/to/report.csv")
                        .desired_width(360.0),
                );
                let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let pick = ui.add_enabled(!processing, egui::Button::new("Select"));
                if entered || pick.clicked() {
                    state.select_typed_path();
                }
            });
            ui.add_space(12.0);
        });
    });

    if let Some(message) = &state.validation_error {
        ui.label(egui::RichText::new(message).color(palette.error));
    }

    ui.add_space(8.0);

    // ── Actions ───────────────────────────────────────────────────────
    ui.horizontal(|ui| {
        let send = ui.add_enabled(
            state.workflow.can_submit(),
            egui::Button::new("▶ Send").min_size(egui::vec2(70.0, 28.0)),
        );
        if send.clicked() {
            state.submit();
        }
        let clear = ui.add_enabled(
            state.workflow.file().is_some(),
            egui::Button::new("✕ Clear").min_size(egui::vec2(70.0, 28.0)),
        );
        if clear.clicked() {
            state.clear();
        }
        if processing {
            ui.spinner();
            let rows = state
                .workflow
                .highlights()
                .map(|h| h.rows_affected)
                .unwrap_or(0);
            ui.label(format!("Analysing... {} rows so far", format_count(rows)));
        }
    });

    ui.add_space(12.0);

    // ── Outcome ───────────────────────────────────────────────────────
    match state.workflow.status() {
        AnalysisStatus::Error => {
            let reason = state.workflow.error().unwrap_or_default();
            ui.label(
                egui::RichText::new(format!("Analysis failed: {reason}"))
                    .color(palette.error),
            );
        }
        AnalysisStatus::Completed => {
            ui.label(egui::RichText::new("✓ Done").color(palette.success));
            ui.add_space(4.0);
        }
        AnalysisStatus::Idle | AnalysisStatus::Processing => {}
    }

    if let Some(highlights) = state.workflow.highlights() {
        egui::ScrollArea::vertical().show(ui, |ui| {
            highlight_grid(ui, "upload_cards", highlights);
        });
    }
}
