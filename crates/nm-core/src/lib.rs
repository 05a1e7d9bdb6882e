//! # nm-core
//!
//! Shared vocabulary for the node manager settings store: the closed set of
//! persisted keys, the value type that travels between the in-memory cache and
//! the INI file, the built-in defaults, and the string coercion rules used when
//! reading values back.
//!
//! This crate has no dependencies on the file system or the process
//! environment.  Everything that touches the disk lives in `nm-settings`.
//!
//! # Why coercion? (for beginners)
//!
//! An INI file only stores text.  A value written as a list
//! (`[".launch", ".yaml"]`) or a boolean (`true`) comes back as a string the
//! next time the file is read, sometimes in a format produced by another tool.
//! The [`str2bool`] and [`str2list`] helpers turn those strings back into typed
//! values without ever failing: malformed input degrades to a best-effort
//! result instead of an error.

pub mod domain;

pub use domain::coerce::{str2bool, str2list};
pub use domain::key::{SettingKey, UnknownKeyError};
pub use domain::value::SettingValue;
