//! Resolution entry points: build the tree, apply overrides, flatten, and
//! project the install plan.

use std::path::Path;

use volt_core::config::{GlobalConfig, ResolverConfig};
use volt_core::lockfile::LOCK_PATH;
use volt_core::manifest::RootPackage;

use crate::builder::build_tree;
use crate::cache::ManifestCache;
use crate::error::ResolutionError;
use crate::flatten::{flatten, Flattened};
use crate::overrides::apply_overrides;
use crate::plan::InstallPlan;
use crate::provider::{LocalStoreProvider, ManifestProvider};
use crate::tree::{DependencyNode, DependencyTree};

/// The output of a successful resolution.
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    /// The tree after overrides; detached nodes are kept in its arena.
    pub tree: DependencyTree,
    pub flattened: Flattened,
    /// Every recovered problem, in the order the nodes were discovered.
    pub warnings: Vec<String>,
    pub plan: InstallPlan,
}

impl ResolutionResult {
    /// The node chosen for a package name.
    pub fn package(&self, name: &str) -> Option<&DependencyNode> {
        self.flattened.get(name).map(|idx| self.tree.node(idx))
    }

    /// One-line closing message for the warning count.
    pub fn summary(&self) -> String {
        match self.warnings.len() {
            0 => "Finished without warnings.".to_string(),
            1 => "Finished with 1 warning.".to_string(),
            n => format!("Finished with {n} warnings."),
        }
    }
}

/// Resolve the dependencies of `root` with a fresh manifest cache.
pub async fn resolve<P: ManifestProvider>(
    root: &RootPackage,
    provider: &P,
    config: &ResolverConfig,
) -> Result<ResolutionResult, ResolutionError> {
    let cache = ManifestCache::new();
    resolve_with_cache(root, provider, &cache, config).await
}

/// Resolve the dependencies of `root`, reusing manifests already in `cache`.
pub async fn resolve_with_cache<P: ManifestProvider>(
    root: &RootPackage,
    provider: &P,
    cache: &ManifestCache,
    config: &ResolverConfig,
) -> Result<ResolutionResult, ResolutionError> {
    tracing::info!("Resolving dependencies of {}@{}", root.id, root.version);

    let mut tree = build_tree(root, provider, cache, config).await?;
    apply_overrides(&mut tree);
    let flattened = flatten(&tree)?;
    let plan = InstallPlan::project(&tree, &flattened);
    let warnings = tree.warnings();

    tracing::info!(
        "Resolved {} package(s) with {} warning(s)",
        plan.len(),
        warnings.len()
    );
    Ok(ResolutionResult {
        tree,
        flattened,
        warnings,
        plan,
    })
}

/// Resolve the project containing `start` against the local package store
/// and write `cache/dependencies.json` next to its `package.json`.
pub async fn resolve_project(
    start: &Path,
    config: &GlobalConfig,
) -> miette::Result<ResolutionResult> {
    let (project_dir, root) = RootPackage::discover(start)?;
    let provider = LocalStoreProvider::new(config.packages_dir());

    let result = resolve(&root, &provider, &config.resolver).await?;
    result.plan.to_lock().write_to(&project_dir.join(LOCK_PATH))?;
    Ok(result)
}
