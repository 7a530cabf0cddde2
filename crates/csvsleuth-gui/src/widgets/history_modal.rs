/// Single-entry history viewer.
use crate::state::AppState;
use crate::widgets::highlights::highlight_grid;

/// Show the selected history entry, if the viewer is open.
pub fn history_modal(ctx: &egui::Context, state: &mut AppState) {
    let Some(entry) = state.history.open_entry().cloned() else {
        return;
    };
    let Some(highlights) = entry.highlights.as_ref() else {
        return;
    };

    let mut open = true;
    egui::Window::new(format!("📄 {}", entry.file_name))
        .id(egui::Id::new("history_modal"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([680.0, 0.0])
        .show(ctx, |ui| {
            let muted = ui.visuals().weak_text_color();
            ui.label(
                egui::RichText::new(format!(
                    "Analysed {}",
                    entry
                        .timestamp
                        .with_timezone(&chrono::Local)
                        .format("%d %b %Y %H:%M")
                ))
                .size(12.0)
                .color(muted),
            );
            ui.add_space(8.0);
            highlight_grid(ui, "history_modal_cards", highlights);
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("Close").clicked() {
                    state.dismiss_entry();
                }
            });
        });

    if !open {
        state.dismiss_entry();
    }
}
