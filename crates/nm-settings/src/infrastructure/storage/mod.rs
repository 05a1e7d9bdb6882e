//! Storage infrastructure: preference file persistence.
//!
//! The settings object never opens files itself.  It asks a [`StoreFactory`]
//! for a [`PreferenceStore`] bound to one file, performs a single read or
//! write, and drops the store again, so nothing is held open between calls.
//!
//! Two factories are provided:
//!
//! - [`ini_store::IniStoreFactory`] reads and writes real INI files.
//! - [`memory::MemoryStoreFactory`] keeps "files" in a shared map and records
//!   every write, for tests that should not touch the disk.

use std::path::{Path, PathBuf};

use nm_core::SettingValue;
use thiserror::Error;

pub mod ini_store;
pub mod memory;

/// Error type for preference file operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing preferences at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid INI.
    #[error("failed to parse preferences at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ini::ParseError,
    },
}

/// A flat key/value view of one preference file.
pub trait PreferenceStore {
    /// Returns the stored value for `key`, or `None` when it is absent.
    fn get(&self, key: &str) -> Option<SettingValue>;

    /// Returns the stored value for `key`, or `default` when it is absent.
    fn get_or(&self, key: &str, default: SettingValue) -> SettingValue {
        self.get(key).unwrap_or(default)
    }

    /// Stores `value` under `key` and writes the file before returning.
    fn set(&mut self, key: &str, value: &SettingValue) -> Result<(), StoreError>;

    /// The file this store is bound to.
    fn path(&self) -> &Path;
}

/// Opens and removes preference files.
pub trait StoreFactory {
    /// Opens the preference file at `path`.  A missing file opens as empty.
    fn open(&self, path: &Path) -> Result<Box<dyn PreferenceStore>, StoreError>;

    /// Deletes the preference file at `path`.  A missing file is not an error.
    fn remove(&self, path: &Path) -> Result<(), StoreError>;

    /// Returns `true` if a preference file exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}
