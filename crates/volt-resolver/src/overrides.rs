//! Ancestor overrides: a package required directly by an ancestor wins over
//! the same package required deeper in that ancestor's subtree.

use std::collections::VecDeque;

use petgraph::stable_graph::NodeIndex;

use crate::conflict::OverrideKind;
use crate::tree::DependencyTree;
use crate::warning::Warning;

/// Detach every node shadowed by an ancestor's direct requirement and warn
/// the requiring node when the replacement is not a safe upgrade.
///
/// Nodes are visited breadth-first from the root's children, so a node is
/// judged only after every shallower node has been settled. A detached node's
/// subtree is not visited. Returns the number of nodes detached.
pub fn apply_overrides(tree: &mut DependencyTree) -> usize {
    let mut queue: VecDeque<NodeIndex> = tree.children(tree.root()).into();
    let mut detached = 0;

    while let Some(node) = queue.pop_front() {
        let Some((owner, ancestor, replacement)) = find_override(tree, node) else {
            queue.extend(tree.children(node));
            continue;
        };

        let subject = tree.node(node);
        let chosen = tree.node(replacement);
        if let Some(kind) =
            OverrideKind::classify((&chosen.id, &chosen.version), (&subject.id, &subject.version))
        {
            let warning = Warning::Override {
                ancestor: tree.node(ancestor).label(),
                overridden: tree.path(node),
                replacement: chosen.label(),
                kind,
            };
            tree.push_warning(owner, warning.to_string());
        }

        tracing::debug!("{} overridden by {}", tree.path(node), tree.path(replacement));
        tree.detach(node);
        detached += 1;
    }

    tracing::info!("Applied {detached} override(s)");
    detached
}

/// Nearest ancestor above `node`'s owner that directly requires a package
/// with the same name. Returns `(owner, ancestor, replacement)`.
fn find_override(
    tree: &DependencyTree,
    node: NodeIndex,
) -> Option<(NodeIndex, NodeIndex, NodeIndex)> {
    let owner = tree.parent(node)?;
    let id = &tree.node(node).id;
    tree.ancestors(owner).find_map(|ancestor| {
        tree.children(ancestor)
            .into_iter()
            .find(|&child| tree.node(child).id.same_name(id))
            .map(|replacement| (owner, ancestor, replacement))
    })
}
