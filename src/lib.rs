//! # Globe Travel
//!
//! An interactive 3D globe for planning trips. Countries are shown as markers
//! on a rotatable globe; clicking one opens a travel form with two tabs:
//! - **Standard travel**: flights, accommodation, rental car and public transit
//! - **Custom details**: attractions, restaurants, activities, notes and budget
//!
//! ## Features
//! - Orbit camera with damping, zoom limits and optional auto-rotation
//! - Hover highlighting and click-to-plan markers
//! - Plans persisted locally and restored on startup
//! - Export and import of all plans as JSON

#![deny(unsafe_code)]

pub mod constants;
pub mod countries;
pub mod projection;
pub mod scene;
pub mod storage;
pub mod store;
pub mod types;
mod ui;

pub use projection::{lat_lng_to_vector3, vector3_to_lat_lng};
pub use storage::{PlanStorage, StorageBackend, StorageError};
pub use store::{StoreChange, TravelStore};
pub use types::*;
pub use ui::GlobeTravelApp;

/// Runs the desktop application.
///
/// Window size and view preferences are restored from the previous session.
///
/// # Returns
///
/// Returns `Ok(())` when the window is closed, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), eframe::Error> {
///     globe_travel::run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Globe Travel",
        options,
        Box::new(|cc| Ok(Box::new(GlobeTravelApp::new(cc)))),
    )
}

/// Starts the application on an existing canvas element in the browser.
#[cfg(target_arch = "wasm32")]
pub async fn start_web(canvas: web_sys::HtmlCanvasElement) -> Result<(), String> {
    eframe::WebRunner::new()
        .start(
            canvas,
            eframe::WebOptions::default(),
            Box::new(|cc| Ok(Box::new(GlobeTravelApp::new(cc)))),
        )
        .await
        .map_err(|e| format!("{e:?}"))
}
