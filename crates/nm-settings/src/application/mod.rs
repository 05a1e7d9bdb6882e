//! Application layer for the settings store.
//!
//! Depends on `nm_core` for keys and values and on the storage traits of the
//! infrastructure layer, which are injected rather than constructed here.

pub mod settings;
pub mod terminal;
