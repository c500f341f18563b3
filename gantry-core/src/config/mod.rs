//! Configuration types
//!
//! Board-agnostic machine description: axes, extruder drives, command
//! letters and limits. Optionally persisted as postcard binary data or
//! loaded from TOML text.

pub mod machine;
#[cfg(feature = "toml")]
pub mod toml;

pub use machine::*;
