//! Domain types for the settings store.
//!
//! Pure data and pure functions only: no file I/O and no environment reads.
//! Outer layers (the `nm-settings` application and infrastructure modules)
//! depend on these types, never the other way round.

/// Case-tolerant string coercions: `str2bool` and `str2list`.
pub mod coerce;

/// Built-in fallback values used when a key is absent from the store.
pub mod defaults;

/// The closed set of persisted setting keys.
pub mod key;

/// The value type stored under a key.
pub mod value;
