//! User interface for the globe travel planner.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main GlobeTravelApp
//! - `globe` - Orbit camera input, marker hover and click selection
//! - `rendering` - Drawing the globe, markers and overlays
//! - `form` - The two-tab travel form
//! - `file_ops` - Export and import of plans for native and WASM

mod file_ops;
mod form;
mod globe;
mod rendering;
mod state;

pub use state::GlobeTravelApp;

use self::form::FormAction;
use crate::constants::APP_STATE_KEY;
use eframe::egui;

/// Narrowest the travel form panel may be dragged.
const MIN_FORM_PANEL_WIDTH: f32 = 320.0;

impl eframe::App for GlobeTravelApp {
    /// Persist view preferences between restarts.
    ///
    /// Travel plans are written to their own storage on every save, so only
    /// the view settings go through eframe.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.settings.to_json() {
            Ok(json) => storage.set_string(APP_STATE_KEY, json),
            Err(err) => log::error!("Failed to serialize view settings: {err}"),
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// Lays out the toolbar, the travel form panel (while a country is
    /// selected) and the globe in the remaining space.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.settings.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_pending_operations(ctx);

        // Restore native window size once per session (desktop only)
        #[cfg(not(target_arch = "wasm32"))]
        {
            if !self.applied_viewport_restore {
                if let Some((w, h)) = self.settings.window_inner_size {
                    ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(w, h)));
                }
                self.applied_viewport_restore = true;
            }
            self.remember_window_size(ctx);
        }

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        if self.form.is_some() {
            self.draw_form_panel(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(ctx.style().visuals.extreme_bg_color))
            .show(ctx, |ui| {
                self.draw_globe(ui);
            });

        self.draw_title_overlay(ctx);
        self.draw_stats_overlay(ctx);

        if self.file.show_clear_dialog {
            self.draw_clear_dialog(ctx);
        }
    }
}

impl GlobeTravelApp {
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut auto_rotate = self.settings.auto_rotate;
            if ui.checkbox(&mut auto_rotate, "Auto-rotate").changed() {
                self.toggle_auto_rotate();
            }
            if ui.button("Reset View").clicked() {
                self.reset_view();
            }

            ui.separator();

            if ui.button("Export Plans").clicked() {
                self.export_plans();
            }
            if ui.button("Import Plans").clicked() {
                self.import_plans_dialog();
            }
            ui.add_enabled_ui(self.store.planned_count() > 0, |ui| {
                if ui.button("Clear All").clicked() {
                    self.file.show_clear_dialog = true;
                }
            });

            ui.separator();
            ui.checkbox(&mut self.settings.dark_mode, "Dark Mode");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(status) = &self.file.status {
                    ui.label(status);
                }
            });
        });
    }

    /// Right-side panel hosting the travel form.
    fn draw_form_panel(&mut self, ctx: &egui::Context) {
        let viewport_width = ctx.input(|i| i.screen_rect().width());
        let max_width = (viewport_width * 0.9).max(MIN_FORM_PANEL_WIDTH);
        let width = self
            .settings
            .form_panel_width
            .clamp(MIN_FORM_PANEL_WIDTH, max_width);

        let mut action = FormAction::None;
        egui::SidePanel::right("travel_form_panel")
            .resizable(true)
            .default_width(width)
            .show(ctx, |ui| {
                self.settings.form_panel_width =
                    ui.available_width().clamp(MIN_FORM_PANEL_WIDTH, max_width);
                if let Some(form) = self.form.as_mut() {
                    let is_saved = self.store.is_saved(form.code());
                    action = form.show(ui, is_saved);
                }
            });

        match action {
            FormAction::Save => self.save_form(),
            FormAction::Cancel => self.close_form(),
            FormAction::Delete => self.delete_plan(),
            FormAction::None => {}
        }
    }

    fn draw_clear_dialog(&mut self, ctx: &egui::Context) {
        egui::Window::new("Clear all plans?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!(
                    "This removes {} saved travel plans. This cannot be undone.",
                    self.store.planned_count()
                ));
                ui.horizontal(|ui| {
                    if ui.button("Clear All").clicked() {
                        self.clear_all_plans();
                        self.file.show_clear_dialog = false;
                    }
                    if ui.button("Cancel").clicked() {
                        self.file.show_clear_dialog = false;
                    }
                });
            });
    }
}
