/// History page: past analyses with open, delete and clear actions.
use crate::state::{AppState, Page};
use crate::theme::Palette;
use csvsleuth_core::model::HistoryEntry;
use egui::Ui;

/// A row action, applied after the list is drawn.
enum HistoryAction {
    Open(HistoryEntry),
    Remove(String),
    ClearAll,
    GenerateMore,
}

/// Draw the history page.
pub fn history_panel(ui: &mut Ui, state: &mut AppState) {
    let palette = Palette::for_visuals(ui.visuals());
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("History");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("🎲 Generate more").clicked() {
                action = Some(HistoryAction::GenerateMore);
            }
            if !state.history.is_empty() && ui.button("🗑 Clear all").clicked() {
                action = Some(HistoryAction::ClearAll);
            }
        });
    });
    ui.add_space(8.0);

    if state.history.is_empty() {
        ui.label(egui::RichText::new("No analyses yet.").color(palette.muted));
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("history_grid")
            .num_columns(4)
            .striped(true)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for entry in state.history.entries() {
                    let (badge, color, tip) = if entry.is_failure() {
                        ("✗", palette.error, "Analysis failed")
                    } else {
                        ("✓", palette.success, "Open highlights")
                    };
                    ui.label(egui::RichText::new(badge).color(color));

                    let name = ui
                        .add_enabled(
                            !entry.is_failure(),
                            egui::Button::new(entry.file_name.as_str()).frame(false),
                        )
                        .on_hover_text(tip)
                        .on_disabled_hover_text(tip);
                    if name.clicked() {
                        action = Some(HistoryAction::Open(entry.clone()));
                    }

                    ui.label(
                        egui::RichText::new(
                            entry
                                .timestamp
                                .with_timezone(&chrono::Local)
                                .format("%d %b %Y %H:%M")
                                .to_string(),
                        )
                        .color(palette.muted),
                    );

                    if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                        action = Some(HistoryAction::Remove(entry.id.clone()));
                    }
                    ui.end_row();
                }
            });
    });

    match action {
        Some(HistoryAction::Open(entry)) => state.open_entry(entry),
        Some(HistoryAction::Remove(id)) => state.remove_entry(&id),
        Some(HistoryAction::ClearAll) => state.clear_history(),
        Some(HistoryAction::GenerateMore) => state.navigate(Page::Generate),
        None => {}
    }
}
