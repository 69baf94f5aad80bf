//! Durable local state: the selected rows and the current page.
//!
//! The raw layer is a string key/value store ([`KeyValueStore`]); the typed
//! layer ([`StateStore`]) owns the two keys and their encodings:
//!
//! - `selectedRows`: JSON object mapping record id to the full record.
//! - `currentPage`: decimal page number.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::StoreError;
use crate::selection::SelectionSet;

pub const SELECTED_ROWS_KEY: &str = "selectedRows";
pub const CURRENT_PAGE_KEY: &str = "currentPage";

/// A string key/value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Box<K> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // Write to a sibling temp file and rename so a crash never leaves a
        // half-written value behind.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.tmp", key));
        {
            let mut file = std::fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same map, which lets tests simulate a
/// restart by handing a clone to a fresh controller.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed view over a [`KeyValueStore`] holding selection and page state.
#[derive(Debug, Clone)]
pub struct StateStore<K> {
    kv: K,
}

impl<K: KeyValueStore> StateStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Load the persisted selection. Missing means empty; a value that does
    /// not decode is dropped with a warning.
    pub fn load_selection(&self) -> Result<SelectionSet, StoreError> {
        let Some(raw) = self.kv.get(SELECTED_ROWS_KEY)? else {
            return Ok(SelectionSet::new());
        };
        match serde_json::from_str(&raw) {
            Ok(set) => Ok(set),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable persisted selection");
                Ok(SelectionSet::new())
            }
        }
    }

    pub fn save_selection(&self, selection: &SelectionSet) -> Result<(), StoreError> {
        let json = serde_json::to_string(selection)?;
        self.kv.set(SELECTED_ROWS_KEY, &json)
    }

    /// Load the persisted page, defaulting to 1. Page 0 clamps to 1.
    pub fn load_page(&self) -> Result<u32, StoreError> {
        let page = self
            .kv
            .get(CURRENT_PAGE_KEY)?
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(1);
        Ok(page.max(1))
    }

    pub fn save_page(&self, page: u32) -> Result<(), StoreError> {
        self.kv.set(CURRENT_PAGE_KEY, &page.to_string())
    }
}
