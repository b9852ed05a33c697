//! Client-local key-value storage.
//!
//! Values are opaque strings; callers serialize them (the animation flag is
//! stored as JSON `true`/`false`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use folio_common::config::config_dir;
use folio_common::error::FolioResult;

/// Minimal string key-value store.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> FolioResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> FolioResult<()>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// Volatile store, for tests and for sessions that must not touch disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> FolioResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> FolioResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Store backed by a single JSON object on disk.
///
/// Every `set` rewrites the file so a fresh process sees the last value.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the standard per-user location.
    pub fn default_location() -> Self {
        Self::new(config_dir().join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> FolioResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> FolioResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> FolioResult<()> {
        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Discarding unreadable preference file");
                BTreeMap::new()
            }
        };
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&values)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(path = ?self.path, key, "Preference written");
        Ok(())
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("folio-store-{}-{name}", std::process::id()))
            .join("preferences.json")
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "true").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let path = temp_path("persist");
        let mut store = JsonFileStore::new(&path);
        store.set("animationsEnabled", "false").unwrap();
        store.set("other", "1").unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.get("animationsEnabled").unwrap().as_deref(),
            Some("false")
        );
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("1"));

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = JsonFileStore::new(temp_path("missing"));
        assert_eq!(store.get("animationsEnabled").unwrap(), None);
    }

    #[test]
    fn test_file_store_recovers_from_garbage() {
        let path = temp_path("garbage");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert!(store.get("animationsEnabled").is_err());
        store.set("animationsEnabled", "true").unwrap();
        assert_eq!(
            store.get("animationsEnabled").unwrap().as_deref(),
            Some("true")
        );

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
