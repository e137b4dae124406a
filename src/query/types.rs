//! Query types and result structures

use crate::graph::{NodeId, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction for graph traversal, relative to data flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow sources feeding into a node
    #[default]
    Upstream,
    /// Follow consumers fed by a node
    Downstream,
    /// Union of upstream and downstream neighbors
    Both,
}

impl Direction {
    pub fn includes_upstream(self) -> bool {
        matches!(self, Direction::Upstream | Direction::Both)
    }

    pub fn includes_downstream(self) -> bool {
        matches!(self, Direction::Downstream | Direction::Both)
    }
}

/// One node produced by a traversal, with its BFS distance from the start
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisitRecord {
    pub node: NodeId,
    pub depth: usize,
}

impl VisitRecord {
    pub fn new(node: impl Into<NodeId>, depth: usize) -> Self {
        Self {
            node: node.into(),
            depth,
        }
    }
}

/// Visited nodes bucketed by node type, each bucket in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeNetwork {
    buckets: BTreeMap<NodeType, Vec<NodeId>>,
}

impl NodeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node to its type's bucket
    pub fn insert(&mut self, node_type: NodeType, node: NodeId) {
        self.buckets.entry(node_type).or_default().push(node);
    }

    /// Nodes of one type, empty when the type was never seen
    pub fn get(&self, node_type: &NodeType) -> &[NodeId] {
        self.buckets.get(node_type).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn types(&self) -> impl Iterator<Item = &NodeType> {
        self.buckets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeType, &[NodeId])> {
        self.buckets.iter().map(|(t, nodes)| (t, nodes.as_slice()))
    }

    /// Total number of nodes across all buckets
    pub fn node_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
