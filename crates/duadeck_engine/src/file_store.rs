use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use engine_logging::{engine_error, engine_warn};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::PersistenceStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store directory missing or not writable: {0}")]
    Dir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create the store directory if needed and check that temp files can be made in it.
pub fn ensure_store_dir(dir: &Path) -> Result<(), StoreError> {
    let dir_error = |err: io::Error| StoreError::Dir(format!("{}: {err}", dir.display()));
    fs::create_dir_all(dir).map_err(dir_error)?;
    // Writes go through a temp file next to the store.
    NamedTempFile::new_in(dir).map_err(dir_error)?;
    Ok(())
}

/// Key-value store kept as one JSON object on disk.
///
/// Every access re-reads the file, so edits made by another process are
/// picked up. Writes go to a temp file that is then renamed over the target.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let dir = store_dir(&path);
        ensure_store_dir(&dir)?;
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> BTreeMap<String, String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(err) => {
                engine_warn!("Failed to read store from {:?}: {}", self.path, err);
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(err) => {
                engine_warn!("Failed to parse store at {:?}: {}", self.path, err);
                BTreeMap::new()
            }
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = store_dir(&self.path);
        let content = serde_json::to_string_pretty(map)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn modify(&self, change: impl FnOnce(&mut BTreeMap<String, String>)) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_map();
        change(&mut map);
        if let Err(err) = self.write_map(&map) {
            engine_error!("Failed to write store to {:?}: {}", self.path, err);
        }
    }
}

impl PersistenceStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.read_map().remove(key)
    }

    fn set_raw(&self, key: &str, value: &str) {
        self.modify(|map| {
            map.insert(key.to_string(), value.to_string());
        });
    }

    fn remove_raw(&self, key: &str) {
        self.modify(|map| {
            map.remove(key);
        });
    }

    fn clear(&self) {
        self.modify(BTreeMap::clear);
    }
}

fn store_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
