//! The host capability the traversal engine consumes

use super::edge::Plug;
use super::error::ProviderResult;
use super::node::{NodeId, NodeType};

/// Node existence, type and adjacency supplied by the host graph
///
/// The trait is object safe; the engine always works against
/// `&dyn GraphProvider`. Neighbor lists are unordered and may contain
/// duplicates (one entry per connected port); callers deduplicate.
pub trait GraphProvider {
    /// Check whether the node currently exists
    fn exists(&self, node: &NodeId) -> bool;

    /// Classification tag of the node
    fn node_type(&self, node: &NodeId) -> ProviderResult<NodeType>;

    /// Nodes feeding into `node`
    fn upstream(&self, node: &NodeId) -> ProviderResult<Vec<NodeId>>;

    /// Nodes fed by `node`
    fn downstream(&self, node: &NodeId) -> ProviderResult<Vec<NodeId>>;

    /// Every link touching `node` as an interleaved plug list
    ///
    /// Consecutive plugs form one link; the direction of each link is not
    /// tagged.
    fn raw_links(&self, node: &NodeId) -> ProviderResult<Vec<Plug>>;

    /// Whether the node comes from a referenced (read-only) source
    fn is_referenced(&self, _node: &NodeId) -> ProviderResult<bool> {
        Ok(false)
    }
}
