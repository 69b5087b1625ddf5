//! Client-local persisted state.
//!
//! Everything the dashboard remembers between runs (the Last.fm session key
//! and the year tabs) goes through [`KeyValueStore`]. [`ClientStorage`] is the
//! single owner of the storage keys and their encodings.

use parking_lot::Mutex;
use scrobstats_common::{encode_year_list, parse_year_list, Result, StatsError};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key of the Last.fm session key.
pub const SESSION_KEY: &str = "lastfm-session";
/// Storage key of the JSON-encoded year list.
pub const YEARS_KEY: &str = "lastfm-years";

/// String key/value persistence.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
    /// Remove every key.
    fn clear(&self) -> Result<()>;
}

/// In-memory store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.lock().clear();
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// The file is read once on open and rewritten atomically on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                StatsError::storage_with_source(
                    format!("Corrupt storage file {}", path.display()),
                    e,
                )
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Storage file not found, starting empty");
                BTreeMap::new()
            }
            Err(e) => {
                return Err(StatsError::storage_with_source(
                    format!("Failed to read storage file {}", path.display()),
                    e,
                ))
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| {
            StatsError::storage_with_source(format!("Failed to create {}", dir.display()), e)
        })?;

        let content = serde_json::to_string_pretty(entries)?;
        let mut file = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| StatsError::storage_with_source("Failed to create temporary file", e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| StatsError::storage_with_source("Failed to write storage file", e))?;
        file.persist(&self.path).map_err(|e| {
            warn!(path = %self.path.display(), "Failed to replace storage file");
            StatsError::storage_with_source("Failed to replace storage file", e.error)
        })?;
        Ok(())
    }

    fn mutate<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries.lock();
        let mut updated = entries.clone();
        change(&mut updated);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        self.mutate(BTreeMap::clear)
    }
}

/// Typed access to the dashboard's persisted state.
#[derive(Clone)]
pub struct ClientStorage {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ClientStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientStorage").finish_non_exhaustive()
    }
}

impl ClientStorage {
    /// Wrap a store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Storage kept in memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Storage backed by a JSON file.
    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(Arc::new(JsonFileStore::open(path)?)))
    }

    /// The stored Last.fm session key.
    pub fn session_key(&self) -> Result<Option<String>> {
        self.store.get(SESSION_KEY)
    }

    /// Remember the Last.fm session key.
    pub fn set_session_key(&self, key: &str) -> Result<()> {
        self.store.set(SESSION_KEY, key)
    }

    /// The stored year list, if one was saved.
    pub fn years(&self) -> Result<Option<Vec<i32>>> {
        self.store
            .get(YEARS_KEY)?
            .map(|raw| parse_year_list(&raw))
            .transpose()
    }

    /// Save the year list as a JSON array.
    pub fn set_years(&self, years: &[i32]) -> Result<()> {
        self.store.set(YEARS_KEY, &encode_year_list(years)?)
    }

    /// Forget everything.
    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_operations() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));

        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("b", "x").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set(SESSION_KEY, "abc").unwrap();
        store.set(YEARS_KEY, "[2024]").unwrap();
        store.remove(YEARS_KEY).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get(SESSION_KEY).unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get(YEARS_KEY).unwrap(), None);

        reopened.clear().unwrap();
        assert_eq!(JsonFileStore::open(&path).unwrap().get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StatsError::Storage { .. })
        ));
    }

    #[test]
    fn test_client_storage_years_round_trip() {
        let storage = ClientStorage::in_memory();
        assert_eq!(storage.years().unwrap(), None);

        storage.set_years(&[2025, 2024]).unwrap();
        assert_eq!(storage.years().unwrap(), Some(vec![2025, 2024]));

        storage.set_session_key("sk").unwrap();
        assert_eq!(storage.session_key().unwrap().as_deref(), Some("sk"));

        storage.clear().unwrap();
        assert_eq!(storage.session_key().unwrap(), None);
    }

    #[test]
    fn test_years_stored_as_json_array() {
        let store = Arc::new(MemoryStore::new());
        let storage = ClientStorage::new(store.clone());
        storage.set_years(&[2020, 2019]).unwrap();

        let raw = store.get(YEARS_KEY).unwrap().unwrap();
        let decoded: Vec<i32> = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded, vec![2020, 2019]);
    }
}
