//! nm-settings library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # Layers
//!
//! - [`application`] holds the [`Settings`] object and the terminal launcher.
//!   It never reads environment variables or touches INI files directly.
//! - [`infrastructure`] holds the adapters: the INI-backed preference store,
//!   the in-memory store used by tests, and the resolution of the ROS
//!   environment (home, log dir, master URI, package dir).

/// Application layer: the settings object and derived helpers.
pub mod application;

/// Infrastructure layer: stores and environment resolution.
pub mod infrastructure;

pub use application::settings::{Settings, SettingsError, SettingsSnapshot};
pub use application::terminal::{ExecutableProbe, FsProbe, TerminalLauncher};
pub use infrastructure::environment::RosEnvironment;
pub use infrastructure::storage::{
    ini_store::IniStoreFactory, memory::MemoryStoreFactory, PreferenceStore, StoreError,
    StoreFactory,
};
