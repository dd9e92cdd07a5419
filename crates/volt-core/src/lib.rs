//! Core data types for the Volt package manager.
//!
//! This crate defines the types shared by resolution and its callers:
//! package identifiers, the root `package.json`, archive manifests with
//! their releases, global configuration, and the resolved dependency lock.
//!
//! This crate is intentionally free of async code and network I/O.

pub mod config;
pub mod lockfile;
pub mod manifest;
pub mod package;
