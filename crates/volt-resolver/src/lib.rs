//! Dependency resolution engine: SemVer, manifest providers and caching,
//! breadth-first tree building, ancestor overrides, flattening with conflict
//! detection, and install plan projection.

pub mod builder;
pub mod cache;
pub mod conflict;
pub mod error;
pub mod flatten;
pub mod overrides;
pub mod plan;
pub mod provider;
pub mod resolver;
pub mod tree;
pub mod version;
pub mod warning;

pub use error::ResolutionError;
pub use resolver::{resolve, resolve_project, resolve_with_cache, ResolutionResult};
