//! Install ordering for a flattened dependency set.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use petgraph::stable_graph::NodeIndex;
use volt_core::lockfile::ResolvedLock;
use volt_core::package::PackageId;

use crate::flatten::Flattened;
use crate::tree::DependencyTree;
use crate::version::Version;

/// One package to materialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub id: PackageId,
    pub version: Version,
    /// Depth of the chosen node in the tree, the root's children being 1.
    pub depth: usize,
}

impl fmt::Display for PlanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version)
    }
}

/// Packages in the order they should be installed: deepest first, so a
/// package comes after everything it depends on in the common case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    entries: Vec<PlanEntry>,
}

impl InstallPlan {
    /// Order the chosen nodes by depth, deepest first. Nodes at the same
    /// depth keep their breadth-first discovery order.
    pub fn project(tree: &DependencyTree, flattened: &Flattened) -> Self {
        let discovery: HashMap<NodeIndex, usize> = tree
            .breadth_first()
            .into_iter()
            .enumerate()
            .map(|(position, idx)| (idx, position))
            .collect();

        let mut chosen: Vec<(usize, usize, NodeIndex)> = flattened
            .nodes()
            .map(|idx| {
                let position = discovery.get(&idx).copied().unwrap_or(usize::MAX);
                (tree.depth(idx), position, idx)
            })
            .collect();
        chosen.sort_by_key(|&(depth, position, _)| (Reverse(depth), position));

        let entries = chosen
            .into_iter()
            .map(|(depth, _, idx)| {
                let node = tree.node(idx);
                PlanEntry {
                    id: node.id.clone(),
                    version: node.version.clone(),
                    depth,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `scope/name -> version` list written to `dependencies.json`.
    pub fn to_lock(&self) -> ResolvedLock {
        ResolvedLock::from_entries(
            self.entries
                .iter()
                .map(|entry| (entry.id.clone(), entry.version.to_string())),
        )
    }
}

impl<'a> IntoIterator for &'a InstallPlan {
    type Item = &'a PlanEntry;
    type IntoIter = std::slice::Iter<'a, PlanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
