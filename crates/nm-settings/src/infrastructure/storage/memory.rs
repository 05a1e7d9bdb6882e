//! In-memory preference store for unit testing.
//!
//! `MemoryStoreFactory` keeps every "file" as a map of key to text in a
//! shared `Arc<Mutex<...>>`, so a store opened, written, and dropped by the
//! settings object is still visible to the test afterwards.  Values are stored
//! as text, exactly as an INI file would, so reads return
//! [`SettingValue::Text`] and exercise the same coercions as the real store.
//!
//! # Usage in tests
//!
//! ```ignore
//! let stores = MemoryStoreFactory::new();
//! let mut settings = Settings::open(env, Box::new(stores.clone()))?;
//!
//! settings.set_default_user("alice")?;
//!
//! assert_eq!(stores.value(&settings.settings_file(), "default_user").as_deref(), Some("alice"));
//! ```
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every write return [`StoreError::Io`],
//! for testing error propagation without a read-only file system.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use nm_core::SettingValue;

use super::{PreferenceStore, StoreError, StoreFactory};

type Files = Arc<Mutex<HashMap<PathBuf, BTreeMap<String, String>>>>;

/// A store factory that keeps all files in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStoreFactory {
    files: Files,
    /// Every `(file, key, value)` written, in order.
    writes: Arc<Mutex<Vec<(PathBuf, String, String)>>>,
    /// When `true`, every write fails with an I/O error.
    pub should_fail: bool,
}

impl MemoryStoreFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key=value` into the file at `path`, creating it if needed.
    pub fn insert(&self, path: &Path, key: &str, value: &str) {
        self.files
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Returns the raw text stored under `key` in the file at `path`.
    pub fn value(&self, path: &Path, key: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .and_then(|file| file.get(key).cloned())
    }

    /// Returns a copy of every write recorded so far.
    pub fn writes(&self) -> Vec<(PathBuf, String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

impl StoreFactory for MemoryStoreFactory {
    fn open(&self, path: &Path) -> Result<Box<dyn PreferenceStore>, StoreError> {
        Ok(Box::new(MemoryStore {
            path: path.to_path_buf(),
            factory: self.clone(),
        }))
    }

    fn remove(&self, path: &Path) -> Result<(), StoreError> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

/// A single in-memory "file".
struct MemoryStore {
    path: PathBuf,
    factory: MemoryStoreFactory,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.factory.value(&self.path, key).map(SettingValue::Text)
    }

    fn set(&mut self, key: &str, value: &SettingValue) -> Result<(), StoreError> {
        if self.factory.should_fail {
            return Err(StoreError::Io {
                path: self.path.clone(),
                source: std::io::Error::other("mock failure"),
            });
        }
        let text = value.to_ini_string();
        self.factory.insert(&self.path, key, &text);
        self.factory
            .writes
            .lock()
            .unwrap()
            .push((self.path.clone(), key.to_string(), text));
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
