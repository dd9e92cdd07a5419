//! Shared utilities for the Volt package manager.
//!
//! Cross-cutting concerns used by the other Volt crates: the unified error
//! type and a couple of filesystem helpers for locating and writing project
//! files.

pub mod errors;
pub mod fs;
