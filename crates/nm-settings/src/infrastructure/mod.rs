//! Infrastructure layer: OS-facing adapters.
//!
//! Contains the file-system preference stores and the code that reads the
//! process environment.  Nothing outside this module calls `std::env`.

pub mod environment;
pub mod package;
pub mod storage;
