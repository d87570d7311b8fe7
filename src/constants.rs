//! Shared application-wide constants.
//! Centralizes tweakable values used across globe rendering, interaction and persistence.

use eframe::egui::Color32;

// Globe geometry
/// Radius of the globe sphere in world units.
pub const GLOBE_RADIUS: f64 = 2.0;
/// Radius at which country markers float above the globe surface.
pub const MARKER_ORBIT_RADIUS: f64 = 2.05;
/// Radius of the faint atmospheric rim drawn around the globe.
pub const ATMOSPHERE_RADIUS: f64 = 2.1;
/// World-space radius of a marker at scale 1.0.
pub const MARKER_RADIUS: f64 = 0.1;
/// Spacing in degrees between graticule lines.
pub const GRATICULE_STEP_DEG: f64 = 30.0;

// Marker scaling
/// Smallest marker scale, reached when the camera is close to the globe.
pub const MARKER_SCALE_MIN: f64 = 0.03;
/// Largest marker scale, reached when the camera is far from the globe.
pub const MARKER_SCALE_MAX: f64 = 0.5;
/// Camera distance at which the unclamped marker scale is zero.
pub const MARKER_SCALE_DISTANCE_OFFSET: f64 = 2.5;
/// Camera distance span over which the marker scale grows by 1.0.
pub const MARKER_SCALE_DISTANCE_SPAN: f64 = 3.0;
/// Static scale multiplier for the hovered marker.
pub const HOVER_SCALE: f64 = 1.2;
/// Angular frequency of the selected marker pulse (radians per second).
pub const PULSE_FREQUENCY: f64 = 3.0;
/// Relative amplitude of the selected marker pulse.
pub const PULSE_AMPLITUDE: f64 = 0.1;
/// Minimum on-screen radius used for pointer picking, in points.
pub const MIN_PICK_RADIUS: f32 = 6.0;

// Marker colors
/// Accent color shared by the selected and hovered markers.
pub const ACCENT_COLOR: Color32 = Color32::from_rgb(0x06, 0xb6, 0xd4);
/// Color of markers whose plan was confirmed saved.
pub const SAVED_COLOR: Color32 = Color32::from_rgb(0x10, 0xb9, 0x81);
/// Neutral marker color.
pub const DEFAULT_MARKER_COLOR: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24);
/// Globe fill color.
pub const OCEAN_COLOR: Color32 = Color32::from_rgb(0x1e, 0x40, 0xaf);

// Camera
/// Initial camera position, looking at the globe center.
pub const INITIAL_CAMERA_POSITION: [f64; 3] = [-2.0, 1.5, 7.0];
/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEG: f64 = 50.0;
/// Closest allowed camera distance from the globe center.
pub const MIN_CAMERA_DISTANCE: f64 = 3.0;
/// Farthest allowed camera distance from the globe center.
pub const MAX_CAMERA_DISTANCE: f64 = 12.0;
/// Fraction of angular velocity removed each frame.
pub const DAMPING_FACTOR: f64 = 0.05;
/// Multiplier applied to drag rotation.
pub const ROTATE_SPEED: f64 = 0.5;
/// Multiplier applied to scroll zoom.
pub const ZOOM_SPEED: f64 = 0.6;
/// Auto-rotation speed; 1.0 is one revolution per minute.
pub const AUTO_ROTATE_SPEED: f64 = 0.5;

// Interaction
/// Delay between a marker click and the resulting selection update, in seconds.
pub const CLICK_SELECT_DELAY_SECS: f64 = 0.01;

// Persistence
/// Namespace key holding every persisted travel record.
pub const STORAGE_KEY: &str = "globe_travel_data";
/// Key under which eframe persists UI preferences.
pub const APP_STATE_KEY: &str = "app_state";
/// Default file name for exported plans.
pub const EXPORT_FILE_NAME: &str = "globe-travel-plans.json";
