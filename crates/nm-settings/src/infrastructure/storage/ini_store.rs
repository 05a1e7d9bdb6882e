//! INI-based preference persistence.
//!
//! Keys are written flat, outside any section:
//!
//! ```ini
//! default_user=robot
//! launch_history_length=5
//! launch_view_file_ext=.launch, .yaml, .conf
//! store_geometry=true
//! ```
//!
//! Files written by Qt's `QSettings` keep section-less keys in a `[General]`
//! section instead.  Reads fall back to that section so an existing
//! `settings.ini` keeps working; a write to such a key moves it to the
//! section-less part.
//!
//! Values are stored verbatim apart from surrounding whitespace, which the
//! INI format does not preserve: `"quoted"` reads back with its quotes, while
//! `  padded  ` reads back as `padded`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use nm_core::SettingValue;
use tracing::{debug, info};

use super::{PreferenceStore, StoreError, StoreFactory};

/// Section name `QSettings` uses for keys without a group.
const QT_GENERAL_SECTION: &str = "General";

/// Opens [`IniStore`]s on the real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct IniStoreFactory;

impl IniStoreFactory {
    pub fn new() -> Self {
        Self
    }
}

impl StoreFactory for IniStoreFactory {
    fn open(&self, path: &Path) -> Result<Box<dyn PreferenceStore>, StoreError> {
        Ok(Box::new(IniStore::load(path)?))
    }

    fn remove(&self, path: &Path) -> Result<(), StoreError> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                info!("removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// One INI file loaded into memory.
pub struct IniStore {
    path: PathBuf,
    ini: Ini,
}

impl IniStore {
    /// Loads the INI file at `path`, or starts empty if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] for file-system errors other than "not
    /// found", and [`StoreError::Parse`] if the file is not valid INI.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let opt = ParseOption {
            enabled_quote: false,
            ..ParseOption::default()
        };
        let ini = match Ini::load_from_file_opt(path, opt) {
            Ok(ini) => ini,
            Err(ini::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found, starting empty", path.display());
                Ini::new()
            }
            Err(ini::Error::Io(source)) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Err(ini::Error::Parse(source)) => {
                return Err(StoreError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            ini,
        })
    }
}

impl PreferenceStore for IniStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.ini
            .section(None::<String>)
            .and_then(|props| props.get(key))
            .or_else(|| {
                self.ini
                    .section(Some(QT_GENERAL_SECTION))
                    .and_then(|props| props.get(key))
            })
            .map(SettingValue::from)
    }

    fn set(&mut self, key: &str, value: &SettingValue) -> Result<(), StoreError> {
        if let Some(general) = self.ini.section_mut(Some(QT_GENERAL_SECTION)) {
            general.remove(key);
        }
        self.ini
            .with_section(None::<String>)
            .set(key, value.to_ini_string());
        self.ini
            .write_to_file(&self.path)
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!("wrote {key}={value} to {}", self.path.display());
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_opens_empty() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");

        // Act
        let store = IniStore::load(&path).expect("missing file must open");

        // Assert
        assert_eq!(store.get("default_user"), None);
        assert!(!path.exists(), "opening must not create the file");
    }

    #[test]
    fn test_set_writes_through_and_reloads() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        let mut store = IniStore::load(&path).unwrap();

        // Act
        store
            .set("default_user", &SettingValue::from("alice"))
            .unwrap();
        store
            .set("launch_view_file_ext", &SettingValue::from(vec![".launch", ".yaml"]))
            .unwrap();

        // Assert
        let reloaded = IniStore::load(&path).unwrap();
        assert_eq!(reloaded.get("default_user"), Some(SettingValue::from("alice")));
        assert_eq!(
            reloaded.get("launch_view_file_ext"),
            Some(SettingValue::from(".launch, .yaml"))
        );
    }

    #[test]
    fn test_quotes_are_kept_and_whitespace_is_trimmed() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        let mut store = IniStore::load(&path).unwrap();

        // Act
        store
            .set("default_user", &SettingValue::from("\"quoted\""))
            .unwrap();
        store
            .set("log_viewer", &SettingValue::from("  padded  "))
            .unwrap();

        // Assert
        let reloaded = IniStore::load(&path).unwrap();
        assert_eq!(
            reloaded.get("default_user"),
            Some(SettingValue::from("\"quoted\""))
        );
        assert_eq!(reloaded.get("log_viewer"), Some(SettingValue::from("padded")));
    }

    #[test]
    fn test_reads_qt_general_section() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        std::fs::write(&path, "[General]\ndefault_user=bob\nstore_geometry=false\n").unwrap();

        // Act
        let store = IniStore::load(&path).unwrap();

        // Assert
        assert_eq!(store.get("default_user"), Some(SettingValue::from("bob")));
        assert_eq!(store.get_or("missing", SettingValue::from("x")), SettingValue::from("x"));
    }

    #[test]
    fn test_set_moves_key_out_of_general_section() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        std::fs::write(&path, "[General]\ndefault_user=bob\n").unwrap();
        let mut store = IniStore::load(&path).unwrap();

        // Act
        store.set("default_user", &SettingValue::from("carol")).unwrap();

        // Assert
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("bob"), "stale value must be gone: {content}");
        let reloaded = IniStore::load(&path).unwrap();
        assert_eq!(reloaded.get("default_user"), Some(SettingValue::from("carol")));
    }

    #[test]
    fn test_write_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("settings.ini");
        let mut store = IniStore::load(&path).unwrap();

        let result = store.set("default_user", &SettingValue::from("x"));

        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_remove_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let factory = IniStoreFactory::new();

        let result = factory.remove(&dir.path().join("redirect"));

        assert!(result.is_ok());
    }

    #[test]
    fn test_remove_deletes_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redirect");
        std::fs::write(&path, "cfg_path=/tmp/x\n").unwrap();
        let factory = IniStoreFactory::new();
        assert!(factory.exists(&path));

        factory.remove(&path).unwrap();

        assert!(!factory.exists(&path));
    }
}
