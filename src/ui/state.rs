//! Application state structures.
//!
//! This module contains the main `GlobeTravelApp` struct together with the
//! smaller state groups it is made of: persisted view preferences, globe
//! interaction state and file operation plumbing.

use super::form::TravelForm;
use crate::constants::APP_STATE_KEY;
use crate::scene::{HoverTracker, OrbitCamera};
use crate::storage::{platform_backend, PlanStorage, StorageBackend};
use crate::store::TravelStore;
use crate::types::CountryCode;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// UI preferences persisted through eframe between restarts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewSettings {
    /// Whether the globe rotates on its own
    pub auto_rotate: bool,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Remembered width of the travel form panel
    pub form_panel_width: f32,
    /// Last known window inner size in logical points (desktop only)
    pub window_inner_size: Option<(f32, f32)>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            auto_rotate: false,
            dark_mode: true,
            form_panel_width: 400.0,
            window_inner_size: None,
        }
    }
}

impl ViewSettings {
    /// Serializes the settings to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads settings from eframe storage, falling back to defaults.
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        let Some(json) = storage.and_then(|s| s.get_string(APP_STATE_KEY)) else {
            return Self::default();
        };
        Self::from_json(&json).unwrap_or_else(|err| {
            log::warn!("Ignoring unreadable view settings: {err}");
            Self::default()
        })
    }
}

/// A marker click waiting for its selection delay to pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSelection {
    pub code: CountryCode,
    /// Input time (seconds) at which the selection is applied
    pub due_at: f64,
}

/// State of the globe view and its pointer interaction.
#[derive(Debug, Clone, Default)]
pub struct GlobeState {
    pub camera: OrbitCamera,
    pub hover: HoverTracker,
    pub pending_selection: Option<PendingSelection>,
}

/// Messages sent from async file operations back to the main app.
#[derive(Debug)]
pub enum FileOperationResult {
    /// Export finished; carries the destination shown to the user
    ExportCompleted(String),
    /// Import file was read; carries the source name and its content
    ImportCompleted(String, String),
    /// Operation failed with an error message
    OperationFailed(String),
}

/// Export/import plumbing and the confirmation dialog for clearing plans.
pub struct FileState {
    pub pending_export: bool,
    pub pending_import: bool,
    pub sender: Sender<FileOperationResult>,
    pub receiver: Receiver<FileOperationResult>,
    /// Last file operation outcome, shown in the toolbar
    pub status: Option<String>,
    pub show_clear_dialog: bool,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            pending_export: false,
            pending_import: false,
            sender,
            receiver,
            status: None,
            show_clear_dialog: false,
        }
    }
}

/// The main application structure.
///
/// Owns the travel store and the persistence adapter, and implements
/// `eframe::App` to draw the globe, the toolbar and the travel form.
pub struct GlobeTravelApp {
    /// Selection, travel records and saved status
    pub store: TravelStore,
    /// Durable storage of confirmed plans
    pub plans: PlanStorage<Box<dyn StorageBackend>>,
    pub settings: ViewSettings,
    pub globe: GlobeState,
    /// Editor for the selected country, if open
    pub form: Option<TravelForm>,
    pub file: FileState,
    /// Whether we've already applied the stored window geometry this session
    pub applied_viewport_restore: bool,
}

impl GlobeTravelApp {
    /// Creates the app for a running eframe instance: restores view settings,
    /// opens the platform storage and repaints on every store change.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = ViewSettings::load(cc.storage);
        let mut app = Self::with_backend(platform_backend(), settings);

        let ctx = cc.egui_ctx.clone();
        app.store.subscribe(move |_, change| {
            log::trace!("store change: {change:?}");
            ctx.request_repaint();
        });
        app
    }

    /// Creates the app over `backend`, hydrating the store from it.
    pub fn with_backend(backend: Box<dyn StorageBackend>, settings: ViewSettings) -> Self {
        let plans = PlanStorage::new(backend);
        let mut store = TravelStore::default();
        store.hydrate(plans.load_all());

        let mut globe = GlobeState::default();
        globe.camera.auto_rotate = settings.auto_rotate;

        Self {
            store,
            plans,
            settings,
            globe,
            form: None,
            file: FileState::default(),
            applied_viewport_restore: false,
        }
    }

    /// Opens, switches or closes the form so it follows the store selection.
    ///
    /// Selecting a country materializes its record in the store; an unknown
    /// code leaves the form closed.
    pub fn sync_form_with_selection(&mut self) {
        let Some(code) = self.store.selected().map(str::to_string) else {
            self.form = None;
            return;
        };
        if self.form.as_ref().is_some_and(|form| form.code() == code) {
            return;
        }

        self.store.ensure_initialized(&code);
        let country_name = self.store.country(&code).map(|c| c.name.clone());
        let record = self.store.get_record(&code).map(|r| r.into_owned());
        self.form = match (country_name, record) {
            (Some(name), Some(record)) => Some(TravelForm::new(&code, &name, record)),
            _ => None,
        };
    }

    /// Commits the open form to the store and to storage, then closes it.
    pub fn save_form(&mut self) {
        let Some(form) = self.form.take() else {
            return;
        };
        let code = form.code().to_string();
        let record = form.commit();

        self.store.upsert_record(&code, record.clone());
        self.plans.save(&code, &record);
        self.store.mark_planned(&code);
        self.store.mark_saved(&code);
        self.store.select(None);
    }

    /// Discards the open form without committing.
    pub fn close_form(&mut self) {
        self.form = None;
        self.store.select(None);
    }

    /// Deletes the plan behind the open form from store and storage.
    pub fn delete_plan(&mut self) {
        let Some(form) = self.form.take() else {
            return;
        };
        let code = form.code();
        self.store.discard_record(code);
        self.plans.remove(code);
        log::info!("deleted travel plan for {code}");
        self.store.select(None);
    }

    /// Removes every plan from store and storage.
    pub fn clear_all_plans(&mut self) {
        self.plans.clear();
        self.store.clear_records();
        self.form = None;
        self.store.select(None);
        log::info!("cleared all travel plans");
    }

    /// Merges exported plans into storage and the store.
    ///
    /// # Returns
    ///
    /// The number of imported records, or an error message if `json` is not a
    /// plan export.
    pub fn import_plans(&mut self, json: &str) -> Result<usize, String> {
        let imported = crate::storage::parse_records(json).map_err(|e| e.to_string())?;
        let count = imported.len();
        let reopen = self
            .form
            .as_ref()
            .is_some_and(|form| imported.contains_key(form.code()));

        let mut merged = self.plans.load_all();
        merged.extend(imported.clone());
        self.plans.replace_all(&merged);
        self.store.hydrate(imported);

        // An open draft of an imported country would overwrite the import on save
        if reopen {
            self.form = None;
            self.sync_form_with_selection();
        }

        log::info!("imported {count} travel plans");
        Ok(count)
    }

    /// Starts or stops automatic globe rotation.
    pub fn toggle_auto_rotate(&mut self) {
        self.settings.auto_rotate = !self.settings.auto_rotate;
        self.globe.camera.auto_rotate = self.settings.auto_rotate;
    }

    /// Restores the initial camera and stops auto-rotation.
    pub fn reset_view(&mut self) {
        self.globe.camera.reset();
        self.settings.auto_rotate = false;
        self.globe.camera.auto_rotate = false;
    }

    /// Captures the current window size so it can be restored next session.
    pub fn remember_window_size(&mut self, ctx: &egui::Context) {
        let size = ctx.input(|i| i.screen_rect().size());
        self.settings.window_inner_size = Some((size.x, size.y));
    }
}
