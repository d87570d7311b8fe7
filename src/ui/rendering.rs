//! Globe rendering: sphere, graticule, atmosphere, markers and overlays.
//!
//! Shapes are painted back to front: atmosphere rim, ocean disk, graticule,
//! markers (far to near), then the hover label.

use super::state::GlobeTravelApp;
use crate::constants::*;
use crate::projection::{lat_lng_to_vector3, vector3_to_lat_lng};
use crate::scene::{base_marker_scale, MarkerState, MarkerVisual, ProjectedMarker, ViewProjection};
use eframe::egui;

/// Number of samples along each graticule line.
const GRATICULE_SAMPLES: usize = 72;

impl GlobeTravelApp {
    /// Paints the globe body with its atmosphere and graticule.
    pub fn paint_globe(&self, painter: &egui::Painter, view: &ViewProjection) {
        let (center, radius) = view.sphere_outline(GLOBE_RADIUS);
        let (_, atmosphere_radius) = view.sphere_outline(ATMOSPHERE_RADIUS);

        painter.circle_filled(
            center,
            atmosphere_radius,
            ACCENT_COLOR.gamma_multiply(0.1),
        );
        painter.circle_filled(center, radius, OCEAN_COLOR.gamma_multiply(0.95));

        self.paint_graticule(painter, view);

        painter.circle_stroke(
            center,
            radius,
            egui::Stroke::new(1.0, ACCENT_COLOR.gamma_multiply(0.4)),
        );
    }

    /// Draws parallels and meridians every [`GRATICULE_STEP_DEG`] degrees,
    /// skipping the far side of the globe.
    fn paint_graticule(&self, painter: &egui::Painter, view: &ViewProjection) {
        let stroke = egui::Stroke::new(1.0, egui::Color32::from_white_alpha(40));
        let step = GRATICULE_STEP_DEG;

        let mut lat = -90.0 + step;
        while lat < 90.0 {
            let samples = (0..=GRATICULE_SAMPLES)
                .map(move |i| (lat, -180.0 + 360.0 * i as f64 / GRATICULE_SAMPLES as f64));
            paint_visible_polyline(painter, view, samples, stroke);
            lat += step;
        }

        let mut lng = -180.0;
        while lng < 180.0 {
            let samples = (0..=GRATICULE_SAMPLES / 2)
                .map(move |i| (-90.0 + 180.0 * i as f64 / (GRATICULE_SAMPLES / 2) as f64, lng));
            paint_visible_polyline(painter, view, samples, stroke);
            lng += step;
        }
    }

    /// Draws every visible marker, farthest first so nearer ones overlap.
    pub fn paint_markers(&self, painter: &egui::Painter, markers: &[ProjectedMarker], time: f64) {
        let hovered = self.globe.hover.hovered();
        let selected = self.store.selected();
        let distance = self.globe.camera.distance;

        let mut ordered: Vec<&ProjectedMarker> = markers.iter().collect();
        ordered.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        for marker in ordered {
            let visual = MarkerVisual {
                state: MarkerState::resolve(&marker.code, hovered, selected),
                saved: self.store.is_saved(&marker.code),
            };
            let color = visual.color();
            let grow = visual.scale(distance, time) / base_marker_scale(distance);
            let radius = marker.radius * grow as f32;

            // Always-on glow keeps markers visible against the ocean
            painter.circle_filled(marker.screen_pos, radius * 2.0, color.gamma_multiply(0.2));
            if visual.is_highlighted() {
                painter.circle_filled(marker.screen_pos, radius * 3.0, color.gamma_multiply(0.4));
            }
            painter.circle_filled(marker.screen_pos, radius, color.gamma_multiply(0.95));
        }
    }

    /// Country name next to the hovered marker.
    pub fn paint_hover_label(&self, painter: &egui::Painter, marker: &ProjectedMarker) {
        let pos = marker.screen_pos + egui::vec2(marker.radius.max(MIN_PICK_RADIUS) + 6.0, 0.0);
        let galley = painter.layout_no_wrap(
            marker.name.clone(),
            egui::FontId::proportional(14.0),
            egui::Color32::WHITE,
        );
        let rect = egui::Align2::LEFT_CENTER
            .anchor_size(pos, galley.size())
            .expand(4.0);
        painter.rect_filled(rect, 4.0, egui::Color32::from_black_alpha(180));
        painter.galley(rect.min + egui::vec2(4.0, 4.0), galley, egui::Color32::WHITE);
    }

    /// Title card in the top-left corner.
    pub fn draw_title_overlay(&self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("title_overlay"))
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(16.0, 48.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.heading("Globe Travel");
                    ui.label("Click countries to plan your journey");
                    let (lat, lng) = vector3_to_lat_lng(&self.globe.camera.position());
                    ui.small(format!("Viewing {lat:.1}°, {lng:.1}°"));
                });
            });
    }

    /// Planned/available counters in the bottom-left corner.
    pub fn draw_stats_overlay(&self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("stats_overlay"))
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    legend_row(ui, SAVED_COLOR, &format!("Planned: {} countries", self.store.planned_count()));
                    legend_row(
                        ui,
                        DEFAULT_MARKER_COLOR,
                        &format!("Available: {} countries", self.store.countries().len()),
                    );
                });
            });
    }
}

/// Paints the visible runs of a lat/lng polyline, breaking it where it
/// crosses behind the globe.
fn paint_visible_polyline(
    painter: &egui::Painter,
    view: &ViewProjection,
    samples: impl Iterator<Item = (f64, f64)>,
    stroke: egui::Stroke,
) {
    let mut run: Vec<egui::Pos2> = Vec::new();
    for (lat, lng) in samples {
        let visible = view.is_surface_visible(lat, lng);
        let projected = visible
            .then(|| view.project(&lat_lng_to_vector3(lat, lng, GLOBE_RADIUS)))
            .flatten();
        match projected {
            Some((pos, _)) => run.push(pos),
            None => {
                if run.len() > 1 {
                    painter.add(egui::Shape::line(std::mem::take(&mut run), stroke));
                }
                run.clear();
            }
        }
    }
    if run.len() > 1 {
        painter.add(egui::Shape::line(run, stroke));
    }
}

fn legend_row(ui: &mut egui::Ui, color: egui::Color32, text: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
        ui.painter().circle_filled(rect.center(), 6.0, color);
        ui.label(text);
    });
}
