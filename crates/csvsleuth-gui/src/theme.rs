/// Semantic colours shared by the panels and widgets.
///
/// Everything else takes its colours from the active `egui::Visuals`, so
/// only the status colours and card fill live here.
use egui::{Color32, Visuals};

/// Status palette for the active theme.
pub struct Palette {
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub accent: Color32,
    pub muted: Color32,
    pub card_fill: Color32,
}

impl Palette {
    pub fn for_visuals(visuals: &Visuals) -> Self {
        if visuals.dark_mode {
            Self {
                success: Color32::from_rgb(0xa6, 0xe3, 0xa1),
                warning: Color32::from_rgb(0xfa, 0xb3, 0x87),
                error: Color32::from_rgb(0xf3, 0x8b, 0xa8),
                accent: visuals.hyperlink_color,
                muted: visuals.weak_text_color(),
                card_fill: Color32::from_rgb(0x2a, 0x2a, 0x3c),
            }
        } else {
            Self {
                success: Color32::from_rgb(0x40, 0xa0, 0x2b),
                warning: Color32::from_rgb(0xdf, 0x8e, 0x1d),
                error: Color32::from_rgb(0xd2, 0x0f, 0x39),
                accent: visuals.hyperlink_color,
                muted: visuals.weak_text_color(),
                card_fill: Color32::from_rgb(0xee, 0xee, 0xf4),
            }
        }
    }
}
