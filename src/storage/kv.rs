//! Local key-value persistence

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
};

use tracing::{debug, info};

/// Minimal string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&mut self, key: &str) -> Result<(), String>;
}

/// In-memory store, lost when dropped
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), String> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file, rewritten on every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, String> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse store {}: {}", path.display(), e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Store {} does not exist yet", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(format!("Failed to read store {}: {}", path.display(), e)),
        };

        info!("Opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    /// Write `entries` to disk and adopt them; on failure nothing changes
    fn commit(&mut self, entries: BTreeMap<String, String>) -> Result<(), String> {
        let contents = serde_json::to_string_pretty(&entries)
            .map_err(|e| format!("Failed to serialize store: {}", e))?;

        // Write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents)
            .map_err(|e| format!("Failed to write store {}: {}", tmp.display(), e))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| format!("Failed to replace store {}: {}", self.path.display(), e))?;

        self.entries = entries;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value.to_string());
        self.commit(entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), String> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut entries = self.entries.clone();
        entries.remove(key);
        self.commit(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_basics() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn json_store_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("store.json");
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set("notepad.content", "buy milk").unwrap();
            store.set("other", "x").unwrap();
            store.remove("other").unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("notepad.content").as_deref(), Some("buy milk"));
        assert_eq!(store.get("other"), None);
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("notes");
        fs::create_dir(&dir).unwrap();

        let mut store = JsonFileStore::open(dir.join("store.json")).unwrap();
        store.set("notepad.content", "first").unwrap();

        fs::remove_dir_all(&dir).unwrap();
        assert!(store.set("notepad.content", "draft").is_err());
        assert_eq!(store.get("notepad.content").as_deref(), Some("first"));
        assert!(store.remove("notepad.content").is_err());
        assert_eq!(store.get("notepad.content").as_deref(), Some("first"));
    }

    #[test]
    fn json_store_rejects_corrupt_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("store.json");
        fs::write(&path, "not json").unwrap();
        assert!(JsonFileStore::open(&path).is_err());
    }
}
