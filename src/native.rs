//! Fast-path traversal over a host's native graph iterator
//!
//! Bypasses [`GraphProvider`](crate::GraphProvider) and lets the host walk its
//! own graph. Results come back in the host's iteration order, which is not
//! the breadth-first order of [`TraverseQuery`](crate::TraverseQuery).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::graph::{GraphResult, NodeId, ResolutionError};
use crate::query::Direction;

/// Host-specific numeric type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeTypeId(pub u32);

impl std::fmt::Display for NativeTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A host's own graph-iteration facility
pub trait NativeGraph {
    /// Host-side node reference
    type Handle: Clone;

    /// Resolve a name to exactly one node
    fn resolve_unique(&self, name: &str) -> Result<Self::Handle, ResolutionError>;

    /// Every node reachable from `handle` (itself included), in host order
    fn native_iterate(
        &self,
        handle: &Self::Handle,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = Self::Handle> + '_>;

    /// Id of the node behind a handle; `None` if the handle no longer refers to a node
    fn node_id(&self, handle: &Self::Handle) -> Option<NodeId>;

    /// Like [`native_iterate`](Self::native_iterate), restricted by the host to one type
    fn native_iterate_by_type(
        &self,
        handle: &Self::Handle,
        type_id: NativeTypeId,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = Self::Handle> + '_>;
}

/// Dependency-graph iterator rooted at one resolved node
pub struct DgIterator<'a, G: NativeGraph> {
    graph: &'a G,
    start: G::Handle,
}

impl<'a, G: NativeGraph> DgIterator<'a, G> {
    /// Resolve `start` on the host; fails if the name is missing or ambiguous
    pub fn new(graph: &'a G, start: &str) -> GraphResult<Self> {
        let start = graph.resolve_unique(start).map_err(|e| {
            warn!(error = %e, "cannot start native iteration");
            e
        })?;
        Ok(Self { graph, start })
    }

    /// Every upstream node, in native order
    pub fn upstream_nodes(&self) -> Vec<NodeId> {
        self.nodes(Direction::Upstream)
    }

    /// Every node reachable in `direction`, in native order
    pub fn nodes(&self, direction: Direction) -> Vec<NodeId> {
        let nodes: Vec<NodeId> = self
            .graph
            .native_iterate(&self.start, direction)
            .filter_map(|h| self.graph.node_id(&h))
            .collect();
        debug!(count = nodes.len(), ?direction, "native iteration complete");
        nodes
    }

    /// Upstream nodes of one native type
    pub fn nodes_of_native_type(&self, type_id: NativeTypeId) -> Vec<NodeId> {
        self.graph
            .native_iterate_by_type(&self.start, type_id, Direction::Upstream)
            .filter_map(|h| self.graph.node_id(&h))
            .collect()
    }
}
