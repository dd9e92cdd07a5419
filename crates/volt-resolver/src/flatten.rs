//! Reduce the overridden tree to one node per package name.

use indexmap::IndexMap;
use petgraph::stable_graph::NodeIndex;

use crate::conflict::is_conflict;
use crate::error::ResolutionError;
use crate::tree::DependencyTree;

/// The chosen node for every distinct package name, in the order names
/// were first met during a breadth-first walk.
#[derive(Debug, Clone, Default)]
pub struct Flattened {
    packages: IndexMap<String, NodeIndex>,
}

impl Flattened {
    /// Chosen node for a package name.
    pub fn get(&self, name: &str) -> Option<NodeIndex> {
        self.packages.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeIndex)> + '_ {
        self.packages.iter().map(|(name, &idx)| (name.as_str(), idx))
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.packages.values().copied()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Pick one node per package name from the nodes still attached to the tree.
///
/// Compatible versions collapse to the greatest one; when two are equal the
/// one met first stays. Incompatible versions of the same name fail with
/// [`ResolutionError::Conflict`].
pub fn flatten(tree: &DependencyTree) -> Result<Flattened, ResolutionError> {
    let mut packages: IndexMap<String, NodeIndex> = IndexMap::new();

    for idx in tree.breadth_first() {
        let incoming = tree.node(idx);
        let Some(&chosen) = packages.get(&incoming.id.name) else {
            packages.insert(incoming.id.name.clone(), idx);
            continue;
        };

        let existing = tree.node(chosen);
        if is_conflict(
            (&existing.id, &existing.version),
            (&incoming.id, &incoming.version),
        ) {
            return Err(ResolutionError::Conflict {
                existing: tree.path(chosen),
                incoming: tree.path(idx),
            });
        }
        if existing.version < incoming.version {
            tracing::debug!("{} replaces {}", incoming, existing);
            // Replacing an existing key keeps its position.
            packages.insert(incoming.id.name.clone(), idx);
        }
    }

    tracing::info!("Flattened to {} package(s)", packages.len());
    Ok(Flattened { packages })
}
