/// Generate page: writes a random sample report to disk.
use crate::state::{AppState, GenerateStatus};
use crate::theme::Palette;
use egui::Ui;

/// Draw the generate page.
pub fn generate_panel(ui: &mut Ui, state: &mut AppState) {
    let palette = Palette::for_visuals(ui.visuals());
    let running = state.generate_status == GenerateStatus::Running;

    ui.heading("Generate a sample report");
    ui.add_space(4.0);
    ui.label(
        egui::RichText::new(
            "Writes a random galactic spend report you can then analyse.",
        )
        .color(palette.muted),
    );
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label("Save to:");
        ui.add_enabled(
            !running,
            egui::TextEdit::singleline(&mut state.generate_path).desired_width(360.0),
        );
        if ui
            .add_enabled(!running, egui::Button::new("🎲 Generate"))
            .clicked()
        {
            state.start_generate();
        }
    });

    ui.add_space(8.0);

    match state.generate_status.clone() {
        GenerateStatus::Idle => {}
        GenerateStatus::Running => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Generating...");
            });
        }
        GenerateStatus::Done(path) => {
            ui.label(
                egui::RichText::new(format!("✓ Saved to {}", path.display()))
                    .color(palette.success),
            );
            if ui.button("▶ Analyse it").clicked() {
                state.analyse_generated();
            }
        }
        GenerateStatus::Failed(message) => {
            ui.label(
                egui::RichText::new(format!("Generation failed: {message}"))
                    .color(palette.error),
            );
        }
    }
}
