//! Per-node summary

use serde::Serialize;
use tracing::warn;

use crate::graph::{GraphProvider, GraphResult, NodeId, NodeType};

/// Type, reference state, namespace and direct neighbors of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeInfo {
    pub name: NodeId,
    pub node_type: NodeType,
    pub is_referenced: bool,
    pub namespace: String,
    /// Distinct upstream neighbors, in provider order
    pub connections_in: Vec<NodeId>,
    /// Distinct downstream neighbors, in provider order
    pub connections_out: Vec<NodeId>,
}

fn dedup(mut nodes: Vec<NodeId>) -> Vec<NodeId> {
    let mut seen = std::collections::HashSet::new();
    nodes.retain(|n| seen.insert(n.clone()));
    nodes
}

/// Describe a node, or `None` (with a warning) if it does not exist
pub fn node_info(provider: &dyn GraphProvider, node: &NodeId) -> GraphResult<Option<NodeInfo>> {
    if !provider.exists(node) {
        warn!(node = %node, "node does not exist");
        return Ok(None);
    }

    Ok(Some(NodeInfo {
        name: node.clone(),
        node_type: provider.node_type(node)?,
        is_referenced: provider.is_referenced(node)?,
        namespace: node.namespace().to_string(),
        connections_in: dedup(provider.upstream(node)?),
        connections_out: dedup(provider.downstream(node)?),
    }))
}
