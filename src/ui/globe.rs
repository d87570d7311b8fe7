//! Globe interaction: orbit camera input, marker hover and click handling.

use super::state::{GlobeTravelApp, PendingSelection};
use crate::constants::CLICK_SELECT_DELAY_SECS;
use crate::scene::{pick_marker, project_markers, ProjectedMarker, ViewProjection};
use eframe::egui;

impl GlobeTravelApp {
    /// Draws the globe into the remaining space and processes its input.
    ///
    /// While the travel form is open the globe ignores pointer input, but it
    /// keeps animating.
    pub fn draw_globe(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        let (now, dt) = ui.input(|i| (i.time, i.stable_dt as f64));
        let interactive = self.form.is_none();

        if interactive {
            self.handle_orbit_input(ui, &response);
        }
        self.globe.camera.update(dt);

        let view = ViewProjection::new(&self.globe.camera, rect);
        let markers = project_markers(self.store.countries(), &view, self.globe.camera.distance);

        if interactive {
            self.handle_marker_pointer(ui, &response, &markers, now);
        } else {
            self.globe.hover.clear();
        }
        self.apply_pending_selection(now);

        self.paint_globe(&painter, &view);
        self.paint_markers(&painter, &markers, now);
        if let Some(code) = self.globe.hover.hovered() {
            if let Some(marker) = markers.iter().find(|m| m.code == code) {
                self.paint_hover_label(&painter, marker);
            }
        }

        if self.globe.camera.is_moving()
            || self.store.selected().is_some()
            || self.globe.pending_selection.is_some()
        {
            ui.ctx().request_repaint();
        }
    }

    /// Drag rotates, scroll zooms. Panning is not supported.
    fn handle_orbit_input(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary) {
            self.globe
                .camera
                .rotate_by_drag(response.drag_delta(), response.rect.height());
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            self.globe.camera.zoom_by_scroll(scroll);
        }
    }

    /// Updates the hovered marker and schedules a selection on click.
    fn handle_marker_pointer(
        &mut self,
        ui: &mut egui::Ui,
        response: &egui::Response,
        markers: &[ProjectedMarker],
        now: f64,
    ) {
        let under_pointer = if response.dragged() {
            None
        } else {
            response.hover_pos().and_then(|pos| pick_marker(markers, pos))
        };
        self.globe.hover.update(under_pointer);

        if self.globe.hover.hovered().is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        if response.clicked() {
            if let Some(code) = response
                .interact_pointer_pos()
                .and_then(|pos| pick_marker(markers, pos))
            {
                self.handle_marker_click(code, now);
            }
        }
    }

    /// Schedules `select(code)` after the click delay so the click does not
    /// race the orbit drag gesture.
    pub fn handle_marker_click(&mut self, code: &str, now: f64) {
        log::debug!("marker clicked: {code}");
        self.globe.pending_selection = Some(PendingSelection {
            code: code.to_string(),
            due_at: now + CLICK_SELECT_DELAY_SECS,
        });
    }

    /// Applies a scheduled selection once its delay has elapsed.
    pub fn apply_pending_selection(&mut self, now: f64) {
        let due = self
            .globe
            .pending_selection
            .as_ref()
            .is_some_and(|pending| now >= pending.due_at);
        if !due {
            return;
        }
        if let Some(pending) = self.globe.pending_selection.take() {
            self.store.select(Some(&pending.code));
            self.sync_form_with_selection();
        }
    }
}
