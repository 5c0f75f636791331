//! Session storage.
//!
//! The auth session is the only state kept across restarts. It is written under a named slot by
//! a [`SessionStorage`] implementation; the stores treat the stored text as opaque.
//!
//! [`FileSessionStorage`] keeps one JSON file per slot:
//!
//! ```text
//! <session_dir>/
//!   auth.json
//! ```

use crate::{ClinicError, ClinicResult};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait SessionStorage: Send + Sync {
    /// Returns the stored text for `key`, or `None` if nothing was stored.
    fn load(&self, key: &str) -> ClinicResult<Option<String>>;

    fn save(&self, key: &str, value: &str) -> ClinicResult<()>;
}

/// Stores each slot as `<dir>/<key>.json`.
#[derive(Clone, Debug)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolves the file for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::InvalidInput`] unless the key is non-empty ASCII alphanumerics,
    /// `-` or `_`, so a slot name can never escape the session directory.
    pub fn path_for(&self, key: &str) -> ClinicResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ClinicError::InvalidInput(format!(
                "invalid session key: {key:?}"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self, key: &str) -> ClinicResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ClinicError::SessionRead(err)),
        }
    }

    fn save(&self, key: &str, value: &str) -> ClinicResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(ClinicError::SessionDirCreation)?;
        fs::write(&path, value).map_err(ClinicError::SessionWrite)
    }
}

/// Keeps slots in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self, key: &str) -> ClinicResult<Option<String>> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slots.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> ClinicResult<()> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_round_trips_slot() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileSessionStorage::new(temp_dir.path().join("nested"));

        assert_eq!(storage.load("auth").unwrap(), None);

        storage.save("auth", "{\"token\":\"t\"}").expect("save should succeed");
        assert!(temp_dir.path().join("nested").join("auth.json").is_file());
        assert_eq!(
            storage.load("auth").unwrap().as_deref(),
            Some("{\"token\":\"t\"}")
        );
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileSessionStorage::new(temp_dir.path());

        for key in ["", "../auth", "a/b", "auth.json"] {
            assert!(
                matches!(storage.save(key, "x"), Err(ClinicError::InvalidInput(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_memory_storage_overwrites_slot() {
        let storage = MemorySessionStorage::new();
        storage.save("auth", "1").unwrap();
        storage.save("auth", "2").unwrap();
        assert_eq!(storage.load("auth").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.load("other").unwrap(), None);
    }
}
