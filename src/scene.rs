//! Globe scene logic: orbit camera, screen projection, marker visuals and
//! pointer picking.
//!
//! Nothing here draws; the `ui` module feeds pointer input in and paints
//! whatever these types compute.

use crate::constants::*;
use crate::projection::{lat_lng_to_vector3, surface_normal};
use crate::types::{Country, CountryCode};
use eframe::egui::{self, Color32, Pos2, Rect};
use nalgebra::Vector3;
use std::f64::consts::PI;

/// Keeps the camera off the poles so the view basis stays well defined.
const POLAR_EPSILON: f64 = 1e-3;
/// Scroll distance (in points) that counts as one wheel notch.
const SCROLL_NOTCH: f64 = 50.0;
/// Velocities smaller than this are snapped to zero.
const REST_THRESHOLD: f64 = 1e-6;

/// Damped orbit controller around the globe center.
///
/// Rotation and zoom are enabled, panning is not. Angles follow the usual
/// spherical convention with `+y` up: `polar` is measured from the north pole
/// and `azimuth` around the polar axis starting at `+z`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub azimuth: f64,
    pub polar: f64,
    pub distance: f64,
    /// Whether the camera slowly circles the globe on its own
    pub auto_rotate: bool,
    pending_azimuth: f64,
    pending_polar: f64,
    initial: (f64, f64, f64),
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let [x, y, z] = INITIAL_CAMERA_POSITION;
        Self::from_position(Vector3::new(x, y, z))
    }
}

impl OrbitCamera {
    /// Creates a camera at `position`, which also becomes the reset target.
    pub fn from_position(position: Vector3<f64>) -> Self {
        let distance = position
            .norm()
            .clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE);
        let polar = (position.y / position.norm())
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let azimuth = position.x.atan2(position.z);
        Self {
            azimuth,
            polar,
            distance,
            auto_rotate: false,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            initial: (azimuth, polar, distance),
        }
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vector3<f64> {
        let sin_polar = self.polar.sin();
        Vector3::new(
            self.distance * sin_polar * self.azimuth.sin(),
            self.distance * self.polar.cos(),
            self.distance * sin_polar * self.azimuth.cos(),
        )
    }

    /// Queues rotation from a pointer drag of `delta` points inside a viewport
    /// `viewport_height` points tall. A drag across the full height turns the
    /// globe by one revolution at rotate speed 1.0.
    pub fn rotate_by_drag(&mut self, delta: egui::Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let height = viewport_height as f64;
        self.pending_azimuth -= 2.0 * PI * delta.x as f64 / height * ROTATE_SPEED;
        self.pending_polar -= 2.0 * PI * delta.y as f64 / height * ROTATE_SPEED;
    }

    /// Zooms by a scroll amount in points; positive values move the camera closer.
    pub fn zoom_by_scroll(&mut self, scroll: f32) {
        if scroll == 0.0 {
            return;
        }
        let notches = scroll as f64 / SCROLL_NOTCH;
        let scale = 0.95_f64.powf(ZOOM_SPEED * notches);
        self.distance = (self.distance * scale).clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE);
    }

    /// Advances damping and auto-rotation by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        if self.auto_rotate {
            self.pending_azimuth -= 2.0 * PI / 60.0 * AUTO_ROTATE_SPEED * dt;
        }

        self.azimuth = (self.azimuth + self.pending_azimuth * DAMPING_FACTOR).rem_euclid(2.0 * PI);
        self.polar = (self.polar + self.pending_polar * DAMPING_FACTOR)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        self.pending_azimuth *= 1.0 - DAMPING_FACTOR;
        self.pending_polar *= 1.0 - DAMPING_FACTOR;
        if self.pending_azimuth.abs() < REST_THRESHOLD {
            self.pending_azimuth = 0.0;
        }
        if self.pending_polar.abs() < REST_THRESHOLD {
            self.pending_polar = 0.0;
        }
    }

    /// True while queued rotation or auto-rotation still moves the camera.
    pub fn is_moving(&self) -> bool {
        self.auto_rotate || self.pending_azimuth != 0.0 || self.pending_polar != 0.0
    }

    /// Restores the initial transform and drops any queued motion.
    pub fn reset(&mut self) {
        let (azimuth, polar, distance) = self.initial;
        self.azimuth = azimuth;
        self.polar = polar;
        self.distance = distance;
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
    }
}

/// Perspective projection of world points into a screen rectangle.
#[derive(Debug, Clone)]
pub struct ViewProjection {
    eye: Vector3<f64>,
    right: Vector3<f64>,
    up: Vector3<f64>,
    forward: Vector3<f64>,
    focal: f64,
    center: Pos2,
}

impl ViewProjection {
    /// Builds the projection for `camera` looking at the origin, drawn into `rect`.
    pub fn new(camera: &OrbitCamera, rect: Rect) -> Self {
        let eye = camera.position();
        let forward = (-eye).normalize();
        let right = forward.cross(&Vector3::y()).normalize();
        let up = right.cross(&forward);
        let focal = (rect.height() as f64 / 2.0) / (CAMERA_FOV_DEG.to_radians() / 2.0).tan();
        Self {
            eye,
            right,
            up,
            forward,
            focal,
            center: rect.center(),
        }
    }

    /// Screen position and view depth of `point`, or `None` behind the camera.
    pub fn project(&self, point: &Vector3<f64>) -> Option<(Pos2, f64)> {
        let v = point - self.eye;
        let depth = v.dot(&self.forward);
        if depth <= f64::EPSILON {
            return None;
        }
        let x = v.dot(&self.right) * self.focal / depth;
        let y = v.dot(&self.up) * self.focal / depth;
        Some((
            egui::pos2(self.center.x + x as f32, self.center.y - y as f32),
            depth,
        ))
    }

    /// On-screen radius of a sphere of `world_radius` at `depth`.
    pub fn screen_radius(&self, world_radius: f64, depth: f64) -> f32 {
        (world_radius * self.focal / depth.max(f64::EPSILON)) as f32
    }

    /// Screen center and radius of the globe outline for a sphere of `radius`.
    pub fn sphere_outline(&self, radius: f64) -> (Pos2, f32) {
        let d = self.eye.norm();
        let r = if d > radius {
            self.focal * radius / (d * d - radius * radius).sqrt()
        } else {
            f64::from(f32::MAX)
        };
        let center = self
            .project(&Vector3::zeros())
            .map(|(p, _)| p)
            .unwrap_or(self.center);
        (center, r as f32)
    }

    /// True if a point on (or just above) the globe faces the camera.
    pub fn is_facing(&self, point: &Vector3<f64>) -> bool {
        point.dot(&self.eye) > GLOBE_RADIUS * GLOBE_RADIUS
    }

    /// True if the surface at `lat`/`lng` faces the camera.
    pub fn is_surface_visible(&self, lat: f64, lng: f64) -> bool {
        surface_normal(lat, lng).dot(&self.eye) > GLOBE_RADIUS
    }
}

/// Interaction state of a marker. Higher variants win when several apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MarkerState {
    Default,
    Hovered,
    Selected,
}

impl MarkerState {
    /// Resolves the state of the marker for `code`.
    pub fn resolve(code: &str, hovered: Option<&str>, selected: Option<&str>) -> Self {
        if selected == Some(code) {
            MarkerState::Selected
        } else if hovered == Some(code) {
            MarkerState::Hovered
        } else {
            MarkerState::Default
        }
    }
}

/// Everything that decides how one marker looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerVisual {
    pub state: MarkerState,
    /// The marker's country has a confirmed save
    pub saved: bool,
}

impl MarkerVisual {
    pub fn color(&self) -> Color32 {
        match (self.state, self.saved) {
            (MarkerState::Selected | MarkerState::Hovered, _) => ACCENT_COLOR,
            (MarkerState::Default, true) => SAVED_COLOR,
            (MarkerState::Default, false) => DEFAULT_MARKER_COLOR,
        }
    }

    /// Marker scale at `camera_distance` and animation time `time` (seconds).
    pub fn scale(&self, camera_distance: f64, time: f64) -> f64 {
        let base = base_marker_scale(camera_distance);
        match self.state {
            MarkerState::Selected => base * (1.0 + (time * PULSE_FREQUENCY).sin() * PULSE_AMPLITUDE),
            MarkerState::Hovered => base * HOVER_SCALE,
            MarkerState::Default => base,
        }
    }

    /// Whether the enlarged glow ring is drawn.
    pub fn is_highlighted(&self) -> bool {
        self.state != MarkerState::Default
    }
}

/// Marker scale from camera distance: smaller when the camera is closer,
/// clamped to `[MARKER_SCALE_MIN, MARKER_SCALE_MAX]`.
pub fn base_marker_scale(camera_distance: f64) -> f64 {
    ((camera_distance - MARKER_SCALE_DISTANCE_OFFSET) / MARKER_SCALE_DISTANCE_SPAN)
        .clamp(MARKER_SCALE_MIN, MARKER_SCALE_MAX)
}

/// Tracks the single hovered marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverTracker {
    hovered: Option<CountryCode>,
}

impl HoverTracker {
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// The pointer entered `code`; it replaces any previously hovered marker.
    pub fn pointer_enter(&mut self, code: &str) {
        self.hovered = Some(code.to_string());
    }

    /// The pointer left `code`. Leaving a marker that is no longer hovered is ignored.
    pub fn pointer_leave(&mut self, code: &str) {
        if self.hovered.as_deref() == Some(code) {
            self.hovered = None;
        }
    }

    /// Feeds the marker currently under the pointer, issuing leave/enter
    /// transitions as needed. Returns true if the hovered marker changed.
    pub fn update(&mut self, under_pointer: Option<&str>) -> bool {
        if self.hovered.as_deref() == under_pointer {
            return false;
        }
        if let Some(previous) = self.hovered.clone() {
            self.pointer_leave(&previous);
        }
        if let Some(code) = under_pointer {
            self.pointer_enter(code);
        }
        log::debug!("hovered marker is now {:?}", self.hovered);
        true
    }

    pub fn clear(&mut self) {
        self.hovered = None;
    }
}

/// A marker that passed the visibility test, in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedMarker {
    pub code: CountryCode,
    pub name: String,
    pub screen_pos: Pos2,
    /// Radius at the base (unanimated) scale
    pub radius: f32,
    pub depth: f64,
}

/// Projects every country marker that faces the camera.
pub fn project_markers(countries: &[Country], view: &ViewProjection, camera_distance: f64) -> Vec<ProjectedMarker> {
    let scale = base_marker_scale(camera_distance);
    countries
        .iter()
        .filter_map(|country| {
            let world = lat_lng_to_vector3(country.lat, country.lng, MARKER_ORBIT_RADIUS);
            if !view.is_facing(&world) {
                return None;
            }
            let (screen_pos, depth) = view.project(&world)?;
            Some(ProjectedMarker {
                code: country.code.clone(),
                name: country.name.clone(),
                screen_pos,
                radius: view.screen_radius(MARKER_RADIUS * scale, depth),
                depth,
            })
        })
        .collect()
}

/// Code of the marker under `pointer`: the nearest one within its pick radius,
/// preferring the one closer to the camera on ties.
pub fn pick_marker(markers: &[ProjectedMarker], pointer: Pos2) -> Option<&str> {
    markers
        .iter()
        .filter_map(|marker| {
            let distance = marker.screen_pos.distance(pointer);
            (distance <= marker.radius.max(MIN_PICK_RADIUS)).then_some((distance, marker))
        })
        .min_by(|(da, a), (db, b)| {
            da.total_cmp(db).then(a.depth.total_cmp(&b.depth))
        })
        .map(|(_, marker)| marker.code.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0))
    }

    #[test]
    fn test_default_camera_matches_initial_position() {
        let camera = OrbitCamera::default();
        let p = camera.position();
        assert!((p.x + 2.0).abs() < EPS);
        assert!((p.y - 1.5).abs() < EPS);
        assert!((p.z - 7.0).abs() < EPS);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = OrbitCamera::default();
        for _ in 0..200 {
            camera.zoom_by_scroll(120.0);
        }
        assert!((camera.distance - MIN_CAMERA_DISTANCE).abs() < EPS);

        for _ in 0..200 {
            camera.zoom_by_scroll(-120.0);
        }
        assert!((camera.distance - MAX_CAMERA_DISTANCE).abs() < EPS);
    }

    #[test]
    fn test_drag_rotation_is_damped_then_settles() {
        let mut camera = OrbitCamera::default();
        let start = camera.azimuth;
        camera.rotate_by_drag(egui::vec2(100.0, 0.0), 600.0);

        camera.update(1.0 / 60.0);
        let after_one = camera.azimuth;
        assert!(after_one != start);

        for _ in 0..1000 {
            camera.update(1.0 / 60.0);
        }
        assert!(!camera.is_moving());

        // Total rotation converges to the full queued amount
        let expected = (start - 2.0 * PI * 100.0 / 600.0 * ROTATE_SPEED).rem_euclid(2.0 * PI);
        assert!((camera.azimuth - expected).abs() < 1e-4);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.rotate_by_drag(egui::vec2(0.0, 10_000.0), 600.0);
        for _ in 0..500 {
            camera.update(1.0 / 60.0);
        }
        assert!(camera.polar >= POLAR_EPSILON && camera.polar <= PI - POLAR_EPSILON);
        assert!((camera.position().norm() - camera.distance).abs() < 1e-9);
    }

    #[test]
    fn test_auto_rotate_moves_camera() {
        let mut camera = OrbitCamera::default();
        camera.auto_rotate = true;
        let start = camera.azimuth;
        for _ in 0..60 {
            camera.update(1.0 / 60.0);
        }
        assert!(camera.azimuth != start);
        assert!(camera.is_moving());
    }

    #[test]
    fn test_reset_restores_initial_transform() {
        let mut camera = OrbitCamera::default();
        let initial = camera.clone();
        camera.rotate_by_drag(egui::vec2(50.0, -30.0), 600.0);
        camera.zoom_by_scroll(300.0);
        for _ in 0..10 {
            camera.update(1.0 / 60.0);
        }

        camera.reset();

        assert!((camera.azimuth - initial.azimuth).abs() < EPS);
        assert!((camera.polar - initial.polar).abs() < EPS);
        assert!((camera.distance - initial.distance).abs() < EPS);
        assert!(!camera.is_moving());
    }

    #[test]
    fn test_origin_projects_to_viewport_center() {
        let view = ViewProjection::new(&OrbitCamera::default(), viewport());
        let (pos, depth) = view.project(&Vector3::zeros()).unwrap();
        assert!((pos.x - 400.0).abs() < 1e-3);
        assert!((pos.y - 300.0).abs() < 1e-3);
        assert!(depth > 0.0);
    }

    #[test]
    fn test_point_behind_camera_is_not_projected() {
        let camera = OrbitCamera::default();
        let view = ViewProjection::new(&camera, viewport());
        let behind = camera.position() * 2.0;
        assert!(view.project(&behind).is_none());
    }

    #[test]
    fn test_near_and_far_side_visibility() {
        let camera = OrbitCamera::default();
        let view = ViewProjection::new(&camera, viewport());
        let toward_camera = camera.position().normalize() * MARKER_ORBIT_RADIUS;
        assert!(view.is_facing(&toward_camera));
        assert!(!view.is_facing(&-toward_camera));
    }

    #[test]
    fn test_base_scale_is_monotonic_and_clamped() {
        assert_eq!(base_marker_scale(MIN_CAMERA_DISTANCE), (3.0 - 2.5) / 3.0);
        assert_eq!(base_marker_scale(0.0), MARKER_SCALE_MIN);
        assert_eq!(base_marker_scale(MAX_CAMERA_DISTANCE), MARKER_SCALE_MAX);
        let mut previous = 0.0;
        for step in 0..100 {
            let scale = base_marker_scale(step as f64 * 0.15);
            assert!(scale >= previous);
            previous = scale;
        }
    }

    #[test]
    fn test_marker_scale_by_state() {
        let hovered = MarkerVisual { state: MarkerState::Hovered, saved: false };
        let default = MarkerVisual { state: MarkerState::Default, saved: true };
        let selected = MarkerVisual { state: MarkerState::Selected, saved: false };
        let base = base_marker_scale(7.0);

        assert!((hovered.scale(7.0, 0.0) - base * HOVER_SCALE).abs() < EPS);
        assert!((default.scale(7.0, 0.0) - base).abs() < EPS);

        let peak = selected.scale(7.0, PI / 2.0 / PULSE_FREQUENCY);
        assert!((peak - base * (1.0 + PULSE_AMPLITUDE)).abs() < EPS);
        let trough = selected.scale(7.0, 3.0 * PI / 2.0 / PULSE_FREQUENCY);
        assert!((trough - base * (1.0 - PULSE_AMPLITUDE)).abs() < EPS);
    }

    #[test]
    fn test_marker_color_priority() {
        let visual = |state, saved| MarkerVisual { state, saved };
        assert_eq!(visual(MarkerState::Selected, true).color(), ACCENT_COLOR);
        assert_eq!(visual(MarkerState::Hovered, true).color(), ACCENT_COLOR);
        assert_eq!(visual(MarkerState::Default, true).color(), SAVED_COLOR);
        assert_eq!(visual(MarkerState::Default, false).color(), DEFAULT_MARKER_COLOR);
    }

    #[test]
    fn test_marker_state_prefers_selection() {
        assert_eq!(MarkerState::resolve("FR", Some("FR"), Some("FR")), MarkerState::Selected);
        assert_eq!(MarkerState::resolve("FR", Some("FR"), Some("JP")), MarkerState::Hovered);
        assert_eq!(MarkerState::resolve("FR", None, None), MarkerState::Default);
    }

    #[test]
    fn test_hover_moving_directly_between_markers() {
        let mut hover = HoverTracker::default();
        assert!(hover.update(Some("A")));
        // Pointer jumps straight onto B without an empty frame in between
        assert!(hover.update(Some("B")));
        assert_eq!(hover.hovered(), Some("B"));

        // A late leave event for A must not clear B
        hover.pointer_leave("A");
        assert_eq!(hover.hovered(), Some("B"));

        assert!(hover.update(None));
        assert_eq!(hover.hovered(), None);
        assert!(!hover.update(None));
    }

    #[test]
    fn test_hover_enter_replaces_previous() {
        let mut hover = HoverTracker::default();
        hover.pointer_enter("A");
        hover.pointer_enter("B");
        assert_eq!(hover.hovered(), Some("B"));
    }

    #[test]
    fn test_far_side_markers_are_not_projected() {
        let camera = OrbitCamera::default();
        let view = ViewProjection::new(&camera, viewport());
        let (lat, lng) = crate::projection::vector3_to_lat_lng(&camera.position());
        let near = Country::new("NEAR", "Near", lat, lng);
        let far = Country::new("FAR", "Far", -lat, lng + 180.0);

        let markers = project_markers(&[near, far], &view, camera.distance);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].code, "NEAR");
        assert!(view.is_surface_visible(lat, lng));
        assert!(!view.is_surface_visible(-lat, lng + 180.0));
    }

    #[test]
    fn test_pick_marker_prefers_nearest() {
        let marker = |code: &str, x: f32, depth: f64| ProjectedMarker {
            code: code.to_string(),
            name: code.to_string(),
            screen_pos: egui::pos2(x, 100.0),
            radius: 5.0,
            depth,
        };
        let markers = vec![marker("A", 100.0, 5.0), marker("B", 108.0, 4.0)];

        assert_eq!(pick_marker(&markers, egui::pos2(101.0, 100.0)), Some("A"));
        assert_eq!(pick_marker(&markers, egui::pos2(107.0, 100.0)), Some("B"));
        assert_eq!(pick_marker(&markers, egui::pos2(104.0, 100.0)), Some("B"));
        assert_eq!(pick_marker(&markers, egui::pos2(300.0, 100.0)), None);
    }
}
