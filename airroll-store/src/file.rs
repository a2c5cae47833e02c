//! Single-file JSON key-value store
//!
//! The whole store is one JSON object of string values. It is read once on
//! open and rewritten on every change through a sibling temporary file and a
//! rename, so a crash mid-write leaves the previous contents in place.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{
    error::{StoreError, StoreResult},
    KeyValueStore,
};

/// JSON object on disk, cached in memory
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("{} does not exist yet, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        Ok(Self { path, entries })
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> StoreResult<()> {
        let text = serde_json::to_string_pretty(&self.entries)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, text).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))
    }
}

impl KeyValueStore for JsonFileStore {
    type Error = StoreError;

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let previous = self.entries.insert(key.to_owned(), value.to_owned());
        self.flush().map_err(|e| {
            // Keep memory and disk in agreement
            match previous {
                Some(old) => self.entries.insert(key.to_owned(), old),
                None => self.entries.remove(key),
            };
            e
        })
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nothing.json")).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        store.set("other", "w").unwrap();
        store.remove("other").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(reopened.get("other").unwrap(), None);
    }

    #[test]
    fn garbage_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn failed_write_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("store.json");
        let mut store = JsonFileStore::open(&path).unwrap();

        assert!(store.set("k", "v").is_err());
        assert_eq!(store.get("k").unwrap(), None);
    }
}
