//! Dependency tree storage and traversal.
//!
//! All nodes live in one petgraph arena owned by [`DependencyTree`]. An edge
//! `parent -> child` means the parent owns the child; the edge carries the
//! child's declaration ordinal so siblings always come back in the order
//! their manifest declared them. Each node also keeps a plain index back to
//! its parent. That back-reference is only used to walk towards the root and
//! survives detachment, so paths of pruned nodes can still be reported.

use std::collections::VecDeque;
use std::fmt;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use volt_core::package::PackageId;

use crate::version::Version;

/// One resolved requirement edge: `id` at `version`, required by `parent`.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    pub id: PackageId,
    pub version: Version,
    pub parent: Option<NodeIndex>,
    pub warnings: Vec<String>,
}

impl DependencyNode {
    /// `scope/name@version`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version)
    }
}

/// Edge label: position of the child among its siblings.
#[derive(Debug, Clone, Copy)]
struct ChildEdge {
    ordinal: usize,
}

/// A dependency tree rooted at the package being resolved for.
///
/// Node indices are handed out in creation order. The builder creates nodes
/// breadth-first, so index order is also breadth-first discovery order.
#[derive(Debug, Clone)]
pub struct DependencyTree {
    graph: StableDiGraph<DependencyNode, ChildEdge>,
    root: NodeIndex,
    next_ordinal: usize,
}

impl DependencyTree {
    /// Create a tree holding only the synthetic root.
    pub fn new(root_id: PackageId, root_version: Version) -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(DependencyNode {
            id: root_id,
            version: root_version,
            parent: None,
            warnings: Vec::new(),
        });
        Self {
            graph,
            root,
            next_ordinal: 0,
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn node(&self, idx: NodeIndex) -> &DependencyNode {
        &self.graph[idx]
    }

    /// Create a node for `id@version` and append it to `parent`'s children.
    pub fn attach(&mut self, parent: NodeIndex, id: PackageId, version: Version) -> NodeIndex {
        let idx = self.graph.add_node(DependencyNode {
            id,
            version,
            parent: Some(parent),
            warnings: Vec::new(),
        });
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        self.graph.add_edge(parent, idx, ChildEdge { ordinal });
        idx
    }

    /// Remove a node from its parent's children. The node and its subtree
    /// stay in the arena (with their parent links) but are no longer
    /// reachable from the root. Returns `false` if it was not attached.
    pub fn detach(&mut self, idx: NodeIndex) -> bool {
        let Some(parent) = self.graph[idx].parent else {
            return false;
        };
        match self.graph.find_edge(parent, idx) {
            Some(edge) => self.graph.remove_edge(edge).is_some(),
            None => false,
        }
    }

    /// Whether the node is the root or still hangs off its parent.
    pub fn is_attached(&self, idx: NodeIndex) -> bool {
        match self.graph[idx].parent {
            None => idx == self.root,
            Some(parent) => self.graph.find_edge(parent, idx).is_some(),
        }
    }

    /// Current children of a node, in declaration order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<(usize, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.weight().ordinal, e.target()))
            .collect();
        edges.sort_unstable_by_key(|&(ordinal, _)| ordinal);
        edges.into_iter().map(|(_, child)| child).collect()
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph[idx].parent
    }

    /// Ancestors of a node from its parent up to the root.
    pub fn ancestors(&self, idx: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.graph[idx].parent,
        }
    }

    /// Number of edges between the root and this node.
    pub fn depth(&self, idx: NodeIndex) -> usize {
        self.ancestors(idx).count()
    }

    /// Full chain from the root, e.g. `app/main@1.0.0 -> a/x@1.0.0`.
    pub fn path(&self, idx: NodeIndex) -> String {
        let mut chain: Vec<String> = self.ancestors(idx).map(|a| self.graph[a].label()).collect();
        chain.reverse();
        chain.push(self.graph[idx].label());
        chain.join(" -> ")
    }

    /// Record a warning on a node.
    pub fn push_warning(&mut self, idx: NodeIndex, warning: String) {
        tracing::warn!("{warning}");
        self.graph[idx].warnings.push(warning);
    }

    /// Every warning recorded in the tree: root first, then in node
    /// discovery order, each node's warnings in the order they were added.
    /// Nodes detached by an override still contribute theirs.
    pub fn warnings(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .flat_map(|idx| self.graph[idx].warnings.iter().cloned())
            .collect()
    }

    /// Nodes reachable from the root (root excluded), breadth-first.
    pub fn breadth_first(&self) -> Vec<NodeIndex> {
        let mut order = Vec::new();
        let mut queue: VecDeque<NodeIndex> = self.children(self.root).into();
        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            queue.extend(self.children(idx));
        }
        order
    }

    /// Number of nodes reachable from the root, root excluded.
    pub fn len(&self) -> usize {
        self.breadth_first().len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edges_directed(self.root, Direction::Outgoing).next().is_none()
    }

    /// Render the attached tree with box-drawing connectors.
    pub fn render(&self) -> String {
        let mut output = format!("{}\n", self.graph[self.root]);
        let children = self.children(self.root);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.render_subtree(&mut output, child, "", i == count - 1);
        }
        output
    }

    fn render_subtree(&self, output: &mut String, idx: NodeIndex, prefix: &str, is_last: bool) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.graph[idx]));

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let children = self.children(idx);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.render_subtree(output, child, &child_prefix, i == count - 1);
        }
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    tree: &'a DependencyTree,
    next: Option<NodeIndex>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let current = self.next?;
        self.next = self.tree.graph[current].parent;
        Some(current)
    }
}
