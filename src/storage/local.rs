//! File-backed key/value store
//!
//! The browser client kept its session and caches in `localStorage`; this is
//! the same idea on disk: one JSON object per data directory, rewritten on
//! every change through a temp file and rename.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::error::{StoreError, StoreResult};
use super::keys;
use crate::api::TokenSource;

/// File name inside the data directory
pub const STORE_FILE: &str = "storage.json";

pub struct LocalStore {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
}

impl LocalStore {
    /// Open (or create) the store in `dir`
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Self::open_file(dir.join(STORE_FILE))
    }

    /// Open the store at an explicit file path
    pub fn open_file(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Map<String, Value>>(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "Local store is corrupt, starting empty");
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = ?path, keys = entries.len(), "Opened local store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode a value; `None` when the key is absent
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let value = self.lock()?.get(key).cloned();
        value
            .map(|v| {
                serde_json::from_value(v).map_err(|e| StoreError::Decode {
                    key: key.to_string(),
                    error: e.to_string(),
                })
            })
            .transpose()
    }

    pub fn get_raw(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().map(|e| e.contains_key(key)).unwrap_or(false)
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        let value = serde_json::to_value(value)?;
        self.update(|entries| {
            entries.insert(key.to_string(), value);
            true
        })
    }

    pub fn remove(&self, key: &str) -> StoreResult<()> {
        self.update(|entries| entries.remove(key).is_some())
    }

    /// Remove several keys with a single write
    pub fn remove_all(&self, keys: &[&str]) -> StoreResult<()> {
        self.update(|entries| {
            let before = entries.len();
            for key in keys {
                entries.remove(*key);
            }
            entries.len() != before
        })
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.update(|entries| {
            entries.clear();
            true
        })
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Map<String, Value>>> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    /// Apply `change` to a copy, write it, and only then swap it in.
    /// `change` returns false when nothing needs writing.
    fn update(&self, change: impl FnOnce(&mut Map<String, Value>) -> bool) -> StoreResult<()> {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        if !change(&mut next) {
            return Ok(());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn persist(&self, entries: &Map<String, Value>) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenSource for LocalStore {
    fn token(&self) -> Option<String> {
        match self.get::<String>(keys::AUTH_TOKEN) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable auth token");
                None
            }
        }
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
