//! Breadth-first construction of the raw dependency tree.

use indexmap::IndexSet;
use petgraph::stable_graph::NodeIndex;
use volt_core::config::ResolverConfig;
use volt_core::manifest::{Requirements, RootPackage};
use volt_core::package::PackageId;

use crate::cache::ManifestCache;
use crate::error::ResolutionError;
use crate::provider::ManifestProvider;
use crate::tree::DependencyTree;
use crate::version::Version;
use crate::warning::Warning;

/// Requirements still to be expanded, together with the node declaring them.
struct Pending {
    owner: NodeIndex,
    requirements: Requirements,
}

/// Build the dependency tree of `root` by walking manifests level by level.
///
/// Every requirement becomes a node under its owner unless its manifest or
/// release cannot be found; those are recorded as warnings on the owner.
/// Cycles, unparsable versions and failures to load a direct dependency of
/// the root abort the build.
pub async fn build_tree<P: ManifestProvider>(
    root: &RootPackage,
    provider: &P,
    cache: &ManifestCache,
    config: &ResolverConfig,
) -> Result<DependencyTree, ResolutionError> {
    let root_version =
        Version::parse(&root.version).map_err(|source| ResolutionError::InvalidVersion {
            path: root.id.to_string(),
            source,
        })?;
    let mut tree = DependencyTree::new(root.id.clone(), root_version);

    let mut level = vec![Pending {
        owner: tree.root(),
        requirements: root.dependencies.clone(),
    }];
    let mut depth = 0;

    while !level.is_empty() {
        depth += 1;
        if config.prefetch {
            let ids: IndexSet<PackageId> = level
                .iter()
                .flat_map(|pending| pending.requirements.keys().cloned())
                .collect();
            tracing::debug!("Prefetching {} manifest(s) at depth {depth}", ids.len());
            let ids: Vec<PackageId> = ids.into_iter().collect();
            cache
                .prefetch(&ids, provider, config.max_concurrent_fetches)
                .await;
        }

        let mut next = Vec::new();
        for pending in level {
            for (id, version_text) in &pending.requirements {
                if let Some(child) =
                    expand(&mut tree, pending.owner, id, version_text, provider, cache).await?
                {
                    next.push(child);
                }
            }
        }
        level = next;
    }

    tracing::info!("Built dependency tree with {} node(s)", tree.len());
    Ok(tree)
}

/// Resolve one requirement of `owner`. Returns the new node's own
/// requirements when it was attached.
async fn expand<P: ManifestProvider>(
    tree: &mut DependencyTree,
    owner: NodeIndex,
    id: &PackageId,
    version_text: &str,
    provider: &P,
    cache: &ManifestCache,
) -> Result<Option<Pending>, ResolutionError> {
    let version = Version::parse(version_text).map_err(|source| {
        ResolutionError::InvalidVersion {
            path: format!("{} -> {id}@{version_text}", tree.path(owner)),
            source,
        }
    })?;

    check_cycle(tree, owner, id, &version)?;

    let manifest = match cache.get(id, provider).await {
        Ok(manifest) => manifest,
        Err(error) if owner == tree.root() => return Err(error.into()),
        Err(error) => {
            let warning = Warning::ProviderFailure {
                requester: tree.path(owner),
                error,
            };
            tree.push_warning(owner, warning.to_string());
            return Ok(None);
        }
    };

    let Some(release) = manifest.release(version_text) else {
        let warning = Warning::MissingRelease {
            requester: tree.path(owner),
            id: id.clone(),
            version: version_text.to_string(),
        };
        tree.push_warning(owner, warning.to_string());
        return Ok(None);
    };

    let child = tree.attach(owner, id.clone(), version);
    tracing::debug!("Attached {}", tree.path(child));
    Ok(Some(Pending {
        owner: child,
        requirements: release.dependencies.clone(),
    }))
}

/// Fail if a package with the same name already sits on the chain from
/// `owner` up to the root.
fn check_cycle(
    tree: &DependencyTree,
    owner: NodeIndex,
    id: &PackageId,
    version: &Version,
) -> Result<(), ResolutionError> {
    let clash = std::iter::once(owner)
        .chain(tree.ancestors(owner))
        .map(|idx| tree.node(idx))
        .find(|node| node.id.same_name(id));

    match clash {
        None => Ok(()),
        Some(node) => {
            let path = format!("{} -> {id}@{version}", tree.path(owner));
            if node.id.scope == id.scope {
                Err(ResolutionError::CircularReference { path })
            } else {
                Err(ResolutionError::AmbiguousCircularReference { path })
            }
        }
    }
}
