/// Highlight card grid, shared by the upload page and the history viewer.
use crate::theme::Palette;
use csvsleuth_core::model::Highlights;
use egui::Ui;

const CARD_WIDTH: f32 = 210.0;
const CARD_HEIGHT: f32 = 64.0;

/// Draw every card of `highlights`, wrapping to as many columns as fit.
pub fn highlight_grid(ui: &mut Ui, id_salt: &str, highlights: &Highlights) {
    let palette = Palette::for_visuals(ui.visuals());
    let cards = highlights.to_cards();
    let spacing = ui.spacing().item_spacing.x;
    let columns = ((ui.available_width() + spacing) / (CARD_WIDTH + spacing))
        .floor()
        .max(1.0) as usize;

    egui::Grid::new(id_salt)
        .spacing([spacing, spacing])
        .show(ui, |ui| {
            for (i, card) in cards.iter().enumerate() {
                egui::Frame::group(ui.style())
                    .fill(palette.card_fill)
                    .show(ui, |ui| {
                        ui.set_min_size(egui::vec2(CARD_WIDTH - 20.0, CARD_HEIGHT - 20.0));
                        ui.set_max_width(CARD_WIDTH - 20.0);
                        ui.vertical(|ui| {
                            ui.label(
                                egui::RichText::new(&card.title)
                                    .size(20.0)
                                    .strong()
                                    .color(palette.accent),
                            );
                            ui.label(
                                egui::RichText::new(card.description)
                                    .size(11.0)
                                    .color(palette.muted),
                            );
                        });
                    });
                if (i + 1) % columns == 0 {
                    ui.end_row();
                }
            }
        });
}
