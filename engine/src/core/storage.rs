//! Local persistence helpers for attempt history.
//!
//! Browsers get `localStorage`, native builds get one JSON file per key under
//! the platform data directory. When neither is reachable every call
//! degrades to a no-op so tasks still run.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no persistent store available")]
    Unavailable,
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode history: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("browser storage rejected the request: {0}")]
    Browser(String),
}

/// Minimal string key-value surface, shaped after `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-process store, used by tests and as a scratch history.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Store for environments without persistence: reads are empty, writes vanish.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl KeyValueStore for NullStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        debug!(key, "null store dropped write");
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{KeyValueStore, StorageError};

    /// One `<key>.json` file per key inside `dir`.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        /// Store rooted in the per-user application data directory.
        pub fn in_project_dirs() -> Option<Self> {
            let dirs = directories::ProjectDirs::from("com", "Probelab", "Probelab")?;
            Some(Self::new(dirs.data_dir().join("history")))
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn path_for(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{key}.json"))
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            match fs::read_to_string(self.path_for(key)) {
                Ok(raw) => Ok(Some(raw)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            fs::create_dir_all(&self.dir)?;
            let target = self.path_for(key);
            let staging = target.with_extension("json.tmp");
            fs::write(&staging, value)?;
            fs::rename(&staging, &target)?;
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            match fs::remove_file(self.path_for(key)) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err.into()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::BrowserStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{KeyValueStore, StorageError};

    /// `window.localStorage`, resolved on every call.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserStore;

    impl BrowserStore {
        pub fn available() -> bool {
            storage().is_ok()
        }
    }

    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        window
            .local_storage()
            .map_err(|err| StorageError::Browser(format!("{err:?}")))?
            .ok_or(StorageError::Unavailable)
    }

    impl KeyValueStore for BrowserStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            storage()?
                .get_item(key)
                .map_err(|err| StorageError::Browser(format!("{err:?}")))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            storage()?
                .set_item(key, value)
                .map_err(|err| StorageError::Browser(format!("{err:?}")))
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            storage()?
                .remove_item(key)
                .map_err(|err| StorageError::Browser(format!("{err:?}")))
        }
    }
}

/// Best store for the current platform, or [`NullStore`] when none is reachable.
pub fn default_store() -> Box<dyn KeyValueStore> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        match FileStore::in_project_dirs() {
            Some(store) => Box::new(store),
            None => {
                warn!("no data directory available; history will not persist");
                Box::new(NullStore)
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        if BrowserStore::available() {
            Box::new(BrowserStore)
        } else {
            warn!("localStorage unavailable; history will not persist");
            Box::new(NullStore)
        }
    }
}

/// Anything stored in a [`History`] must be addressable by id.
pub trait HistoryEntry {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of attempts retained per task (newest kept).
    pub cap: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { cap: 50 }
    }
}

/// Newest-first, bounded list of records stored as one JSON array under `key`.
pub struct History<T, S> {
    store: S,
    key: String,
    cap: usize,
    _record: PhantomData<fn() -> T>,
}

impl<T, S> History<T, S>
where
    T: Serialize + DeserializeOwned + HistoryEntry,
    S: KeyValueStore,
{
    pub fn new(store: S, key: impl Into<String>, config: HistoryConfig) -> Self {
        Self {
            store,
            key: key.into(),
            cap: config.cap.max(1),
            _record: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Stored records, newest first. Missing or corrupt values load as empty.
    pub fn load(&self) -> Vec<T> {
        match self.store.get(&self.key) {
            Ok(raw) => self.parse(raw),
            Err(err) => {
                warn!(key = %self.key, %err, "history read failed; treating as empty");
                Vec::new()
            }
        }
    }

    fn parse(&self, raw: Option<String>) -> Vec<T> {
        let Some(raw) = raw else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!(key = %self.key, %err, "history unreadable; treating as empty");
                Vec::new()
            }
        }
    }

    /// Prepend `record` and drop whatever falls beyond the retention cap.
    ///
    /// A failed read aborts the save so stored attempts are never overwritten.
    /// Unparseable content is replaced.
    pub fn save(&self, record: T) -> Result<(), StorageError> {
        let mut records = self.parse(self.store.get(&self.key)?);
        records.insert(0, record);
        records.truncate(self.cap);
        let raw = serde_json::to_string(&records)?;
        self.store.set(&self.key, &raw)?;
        debug!(key = %self.key, retained = records.len(), "history saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }

    pub fn find(&self, id: &str) -> Option<T> {
        self.load().into_iter().find(|record| record.id() == id)
    }

    pub fn latest(&self) -> Option<T> {
        self.load().into_iter().next()
    }
}
