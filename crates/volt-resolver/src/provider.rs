//! Sources of package manifests.
//!
//! The resolver only sees the [`ManifestProvider`] trait. This module also
//! ships the providers Volt itself uses: an in-memory one, one backed by the
//! local package store, and a combinator that falls back from one to another.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use miette::Diagnostic;
use thiserror::Error;
use volt_core::manifest::{Manifest, Release, RootPackage, PACKAGE_FILE};
use volt_core::package::PackageId;

use crate::version::Version;

/// Why a manifest could not be produced for a package id.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ProviderError {
    #[error("Package {0} not found")]
    NotFound(PackageId),

    #[error("Failed to load manifest of {id}: {message}")]
    Unavailable { id: PackageId, message: String },
}

/// Looks up the manifest of a package by id.
///
/// Implementations decide where manifests come from (local store, remote
/// archives, memory). Each call stands alone; caching is the caller's job.
pub trait ManifestProvider: Sync {
    fn get_manifest(
        &self,
        id: &PackageId,
    ) -> impl Future<Output = Result<Manifest, ProviderError>> + Send;
}

impl<P: ManifestProvider> ManifestProvider for &P {
    fn get_manifest(
        &self,
        id: &PackageId,
    ) -> impl Future<Output = Result<Manifest, ProviderError>> + Send {
        (**self).get_manifest(id)
    }
}

/// Manifests held in memory. Counts how often it was asked for one.
#[derive(Debug, Default)]
pub struct StaticProvider {
    manifests: HashMap<PackageId, Manifest>,
    fetches: AtomicUsize,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a whole manifest, replacing any previous one for `id`.
    pub fn insert_manifest(&mut self, id: PackageId, manifest: Manifest) {
        self.manifests.insert(id, manifest);
    }

    /// Add one release to the manifest of `id`, creating the manifest if needed.
    pub fn insert_release(&mut self, id: PackageId, version: impl Into<String>, release: Release) {
        self.manifests
            .entry(id)
            .or_default()
            .releases
            .insert(version.into(), release);
    }

    /// Total number of `get_manifest` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ManifestProvider for StaticProvider {
    async fn get_manifest(&self, id: &PackageId) -> Result<Manifest, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.manifests
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.clone()))
    }
}

/// Manifests reconstructed from installed packages.
///
/// Layout: `<root>/<scope>/<name>/<version>/package.json`. Every version
/// directory with a readable `package.json` becomes one release.
#[derive(Debug, Clone)]
pub struct LocalStoreProvider {
    root: PathBuf,
}

impl LocalStoreProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding all installed versions of a package.
    pub fn package_dir(&self, id: &PackageId) -> PathBuf {
        self.root.join(&id.scope).join(&id.name)
    }

    fn load(&self, id: &PackageId) -> Result<Manifest, ProviderError> {
        let dir = self.package_dir(id);
        if !dir.is_dir() {
            return Err(ProviderError::NotFound(id.clone()));
        }
        let unavailable = |message: String| ProviderError::Unavailable {
            id: id.clone(),
            message,
        };

        let entries = std::fs::read_dir(&dir)
            .map_err(|e| unavailable(format!("cannot read {}: {e}", dir.display())))?;

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| unavailable(e.to_string()))?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            match Version::parse(name) {
                Ok(version) if entry.path().join(PACKAGE_FILE).is_file() => {
                    versions.push((version, name.to_string()));
                }
                Ok(_) => {}
                Err(_) => tracing::debug!("Skipping non-version entry {}", entry.path().display()),
            }
        }
        if versions.is_empty() {
            return Err(ProviderError::NotFound(id.clone()));
        }
        versions.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let mut manifest = Manifest::default();
        for (_, name) in versions {
            let package = RootPackage::from_path(&dir.join(&name).join(PACKAGE_FILE))
                .map_err(|e| unavailable(e.to_string()))?;
            manifest
                .releases
                .insert(name, Release::new(package.dependencies));
        }
        Ok(manifest)
    }
}

impl ManifestProvider for LocalStoreProvider {
    async fn get_manifest(&self, id: &PackageId) -> Result<Manifest, ProviderError> {
        let manifest = self.load(id)?;
        tracing::debug!("{id}: {} release(s) from files", manifest.releases.len());
        Ok(manifest)
    }
}

/// Asks `primary` first and `secondary` only when `primary` fails.
#[derive(Debug, Clone)]
pub struct FallbackProvider<A, B> {
    primary: A,
    secondary: B,
}

impl<A, B> FallbackProvider<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }
}

impl<A: ManifestProvider, B: ManifestProvider> ManifestProvider for FallbackProvider<A, B> {
    async fn get_manifest(&self, id: &PackageId) -> Result<Manifest, ProviderError> {
        match self.primary.get_manifest(id).await {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                tracing::debug!("{e}; trying fallback source");
                self.secondary.get_manifest(id).await
            }
        }
    }
}

/// The highest release in a manifest by SemVer precedence, skipping keys
/// that are not valid versions. Ties keep the first declared.
pub fn latest_release(manifest: &Manifest) -> Option<(&str, Version)> {
    let mut best: Option<(&str, Version)> = None;
    for key in manifest.releases.keys() {
        let Ok(version) = Version::parse(key) else {
            continue;
        };
        if best.as_ref().map_or(true, |(_, current)| *current < version) {
            best = Some((key.as_str(), version));
        }
    }
    best
}
