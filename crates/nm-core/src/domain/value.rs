//! The value stored under a setting key.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A scalar or list-of-strings preference value.
///
/// Anything read back from an INI file is [`SettingValue::Text`]; the typed
/// variants only exist on the way in, before the value is serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    List(Vec<String>),
    Text(String),
}

impl SettingValue {
    /// Renders the value the way it is written to the INI file.
    ///
    /// Lists are joined with `", "` so that [`crate::str2list`] reads them back
    /// unchanged.
    pub fn to_ini_string(&self) -> String {
        match self {
            SettingValue::Bool(b) => b.to_string(),
            SettingValue::Int(i) => i.to_string(),
            SettingValue::List(items) => items.join(", "),
            SettingValue::Text(s) => s.clone(),
        }
    }

    /// Returns the inner string of a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ini_string())
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Int(v)
    }
}

impl From<usize> for SettingValue {
    fn from(v: usize) -> Self {
        SettingValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Text(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        SettingValue::Text(v)
    }
}

impl From<&Path> for SettingValue {
    fn from(v: &Path) -> Self {
        SettingValue::Text(v.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for SettingValue {
    fn from(v: PathBuf) -> Self {
        SettingValue::from(v.as_path())
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(v: Vec<String>) -> Self {
        SettingValue::List(v)
    }
}

impl From<Vec<&str>> for SettingValue {
    fn from(v: Vec<&str>) -> Self {
        SettingValue::List(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for SettingValue {
    fn from(v: &[&str]) -> Self {
        SettingValue::List(v.iter().map(|s| s.to_string()).collect())
    }
}
