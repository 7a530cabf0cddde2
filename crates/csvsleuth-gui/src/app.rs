/// Main `eframe::App` implementation for CsvSleuth.
///
/// This is the top-level UI layout that composes all panels and widgets.
use crate::panels;
use crate::state::{AppState, Page};
use crate::widgets;
use csvsleuth_core::{AppConfig, SharedStorage};
use std::time::Duration;

/// Pre-built application state.
///
/// Construct this before calling `eframe::run_native` so storage is opened
/// and history loaded before the window appears.
pub struct CsvSleuthState {
    pub(crate) inner: AppState,
}

impl CsvSleuthState {
    /// Build state on top of `storage` and load the history list.
    pub fn build(config: &AppConfig, storage: SharedStorage) -> Self {
        let mut state = AppState::new(config, storage);
        state.reload_history();
        Self { inner: state }
    }
}

/// The CsvSleuth application.
pub struct CsvSleuthApp {
    state: AppState,
}

impl CsvSleuthApp {
    /// Create a new application instance from pre-built state.
    pub fn with_state(cc: &eframe::CreationContext<'_>, state: CsvSleuthState) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self { state: state.inner }
    }

    /// Route files dropped onto the window to the upload page.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(path) = dropped.into_iter().find_map(|f| f.path) else {
            return;
        };
        if self.state.workflow.is_processing() {
            tracing::debug!("Ignored drop of {} while processing", path.display());
            return;
        }
        if self.state.page != Page::Upload {
            self.state.navigate(Page::Upload);
        }
        self.state.select_path(path);
    }
}

impl eframe::App for CsvSleuthApp {
    /// Override the GPU clear colour to match the active theme background.
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        let [r, g, b, a] = visuals.panel_fill.to_array();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Apply theme ───────────────────────────────────────────────────
        if self.state.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        // ── Process background messages ───────────────────────────────────
        let _changed = self.state.process_messages();
        if self.state.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.handle_dropped_files(ctx);

        // ── Top toolbar ───────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .min_height(36.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                widgets::toolbar::toolbar(ui, &mut self.state);
                ui.add_space(4.0);
            });

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &mut self.state);
                ui.add_space(2.0);
            });

        // ── Central page ──────────────────────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| match self.state.page {
            Page::Upload => panels::upload_panel::upload_panel(ui, &mut self.state),
            Page::Generate => panels::generate_panel::generate_panel(ui, &mut self.state),
            Page::History => panels::history_panel::history_panel(ui, &mut self.state),
        });

        // ── History viewer ────────────────────────────────────────────────
        widgets::history_modal::history_modal(ctx, &mut self.state);
    }
}
