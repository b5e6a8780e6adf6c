//! Depth limiting for built trees

use tracing::debug;

use super::node::Node;

/// Default maximum nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 9;
/// Larger depth limits are lowered to this.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Drop every node deeper than `max_depth` from an already built tree.
///
/// `TreeBuilder` applies the same rule while scanning; this is for trees
/// built with a looser limit. Parents keep their full `size_bytes` so
/// totals still describe the real tree; `hidden_descendants` records how
/// many nodes were dropped beneath each of them. Returns the number of
/// nodes dropped by this call.
pub fn collapse(node: &mut Node, max_depth: usize) -> usize {
    if node.depth >= max_depth {
        let hidden: usize = node.children.iter().map(Node::count).sum();
        if hidden > 0 {
            debug!("Collapsed {} nodes under '{}'", hidden, node.path);
            node.children.clear();
            node.hidden_descendants += hidden;
        }
        return hidden;
    }
    node.children
        .iter_mut()
        .map(|child| collapse(child, max_depth))
        .sum()
}
