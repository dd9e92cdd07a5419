//! Resolution session cache for avoiding redundant manifest lookups.
//!
//! Every package id is fetched at most once per cache, no matter how many
//! edges reference it or how many tasks ask for it at the same time: later
//! requesters wait on the first fetch instead of starting their own.
//! Failures are cached too, so a package that could not be loaded is not
//! retried within the same session.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tokio::sync::{Mutex, OnceCell};
use volt_core::manifest::Manifest;
use volt_core::package::PackageId;

use crate::provider::{ManifestProvider, ProviderError};

/// Outcome of one manifest fetch, shared by every requester of that id.
pub type CachedManifest = Result<Arc<Manifest>, ProviderError>;

/// Lazily populated `PackageId -> Manifest` map with single-flight fetching.
#[derive(Debug, Default)]
pub struct ManifestCache {
    entries: Mutex<HashMap<PackageId, Arc<OnceCell<CachedManifest>>>>,
}

impl ManifestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the manifest of `id`, calling `provider` only if no fetch for
    /// this id has happened or is in flight.
    pub async fn get<P: ManifestProvider>(&self, id: &PackageId, provider: &P) -> CachedManifest {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries.entry(id.clone()).or_default().clone()
        };

        if let Some(cached) = cell.get() {
            tracing::debug!("{id}: manifest from cache");
            return cached.clone();
        }

        cell.get_or_init(|| async {
            tracing::debug!("{id}: fetching manifest");
            provider.get_manifest(id).await.map(Arc::new)
        })
        .await
        .clone()
    }

    /// Fetch the manifests of `ids` concurrently, at most `limit` at a time.
    /// Results land in the cache; failures are left for [`get`](Self::get)
    /// callers to observe.
    pub async fn prefetch<P: ManifestProvider>(&self, ids: &[PackageId], provider: &P, limit: usize) {
        stream::iter(ids)
            .for_each_concurrent(limit.max(1), |id| async move {
                let _ = self.get(id, provider).await;
            })
            .await;
    }

    /// Whether a fetch for `id` has completed.
    pub async fn contains(&self, id: &PackageId) -> bool {
        let entries = self.entries.lock().await;
        entries.get(id).is_some_and(|cell| cell.initialized())
    }

    /// Number of ids with a completed fetch.
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
