//! Local persistence of travel records.
//!
//! Every record lives in a single JSON object stored under one namespace key
//! ([`STORAGE_KEY`]). The adapter never surfaces errors: storage access and
//! deserialization failures are logged and degrade to an empty result, since
//! travel plans can always be re-entered by the user.

use crate::constants::STORAGE_KEY;
use crate::types::{CountryCode, TravelRecord};
use std::collections::{BTreeMap, HashMap};

/// Mapping from country code to record, as persisted.
pub type RecordMap = BTreeMap<CountryCode, TravelRecord>;

/// Failures raised by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed travel data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key-value medium.
pub trait StorageBackend {
    /// Reads the value stored under `key`, or `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Stores `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Deletes `key`. Deleting a missing key succeeds.
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }
}

/// Volatile in-process backend.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    values: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under `key`, bypassing deserialization.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Stores each key as `<key>.json` inside a directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileBackend {
    /// Creates a backend rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Backend rooted at `$HOME/.local/share/globe-travel`, or the working
    /// directory when `HOME` is unset.
    pub fn in_data_dir() -> Self {
        let base = std::env::var_os("HOME")
            .map(|home| std::path::PathBuf::from(home).join(".local").join("share"))
            .unwrap_or_else(|| std::path::PathBuf::from("."));
        Self::new(base.join("globe-travel"))
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Browser `window.localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageBackend;

#[cfg(target_arch = "wasm32")]
impl LocalStorageBackend {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageBackend for LocalStorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }
}

/// Default durable backend for the current platform.
pub fn platform_backend() -> Box<dyn StorageBackend> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStorageBackend)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(FileBackend::in_data_dir())
    }
}

/// Parses a serialized record mapping, as stored or exported.
pub fn parse_records(json: &str) -> Result<RecordMap, StorageError> {
    Ok(serde_json::from_str(json)?)
}

/// Persistence adapter over a backend, scoped to [`STORAGE_KEY`].
#[derive(Debug)]
pub struct PlanStorage<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> PlanStorage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stores `record` under `code`, rewriting the whole mapping.
    pub fn save(&mut self, code: &str, record: &TravelRecord) {
        let mut records = self.load_all();
        records.insert(code.to_string(), record.clone());
        match self.write_all(&records) {
            Ok(()) => log::info!("saved travel plan for {}", code),
            Err(e) => log::error!("Failed to save travel data: {}", e),
        }
    }

    /// The stored record for `code`, if any.
    pub fn load(&self, code: &str) -> Option<TravelRecord> {
        self.load_all().remove(code)
    }

    /// Every stored record. Missing, unreadable or malformed storage yields an
    /// empty mapping.
    pub fn load_all(&self) -> RecordMap {
        match self.try_load_all() {
            Ok(records) => records,
            Err(e) => {
                log::error!("Failed to load all travel data: {}", e);
                RecordMap::new()
            }
        }
    }

    /// Deletes the record for `code`.
    pub fn remove(&mut self, code: &str) {
        let mut records = self.load_all();
        if records.remove(code).is_none() {
            return;
        }
        if let Err(e) = self.write_all(&records) {
            log::error!("Failed to remove travel data: {}", e);
        }
    }

    /// Deletes the whole namespace key.
    pub fn clear(&mut self) {
        if let Err(e) = self.backend.delete(STORAGE_KEY) {
            log::error!("Failed to clear travel data: {}", e);
        }
    }

    /// Replaces the stored mapping wholesale.
    pub fn replace_all(&mut self, records: &RecordMap) {
        if let Err(e) = self.write_all(records) {
            log::error!("Failed to replace travel data: {}", e);
        }
    }

    /// Pretty-printed JSON of every stored record, in the export file format.
    pub fn export_json(&self) -> String {
        serde_json::to_string_pretty(&self.load_all()).unwrap_or_else(|e| {
            log::error!("Failed to serialize travel data: {}", e);
            "{}".to_string()
        })
    }

    fn try_load_all(&self) -> Result<RecordMap, StorageError> {
        match self.backend.read(STORAGE_KEY)? {
            Some(json) if !json.trim().is_empty() => parse_records(&json),
            _ => Ok(RecordMap::new()),
        }
    }

    fn write_all(&mut self, records: &RecordMap) -> Result<(), StorageError> {
        let json = serde_json::to_string(records)?;
        self.backend.write(STORAGE_KEY, &json)
    }
}
