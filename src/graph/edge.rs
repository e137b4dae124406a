//! Ports, plugs and directed edges between nodes

use super::node::NodeId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One endpoint of a link: a node and a named port on it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Plug {
    pub node: NodeId,
    pub port: String,
}

impl Plug {
    pub fn new(node: impl Into<NodeId>, port: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
        }
    }
}

impl std::fmt::Display for Plug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.node, self.port)
    }
}

/// Error returned when a `node.port` string has no port part
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Plug must be written as node.port: {0}")]
pub struct PlugParseError(pub String);

impl FromStr for Plug {
    type Err = PlugParseError;

    /// Splits at the first `.`; the port keeps any further dots (`a.b.c` -> `a`, `b.c`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((node, port)) if !node.is_empty() && !port.is_empty() => Ok(Plug::new(node, port)),
            _ => Err(PlugParseError(s.to_string())),
        }
    }
}

/// A directed link from a source port to a destination port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub source_port: String,
    pub dest: NodeId,
    pub dest_port: String,
}

impl Edge {
    /// Create an edge from its two endpoints
    pub fn new(source: Plug, dest: Plug) -> Self {
        Self {
            source: source.node,
            source_port: source.port,
            dest: dest.node,
            dest_port: dest.port,
        }
    }

    pub fn source_plug(&self) -> Plug {
        Plug::new(self.source.clone(), self.source_port.clone())
    }

    pub fn dest_plug(&self) -> Plug {
        Plug::new(self.dest.clone(), self.dest_port.clone())
    }

    /// Check if either endpoint is on the given node
    pub fn involves(&self, node: &NodeId) -> bool {
        &self.source == node || &self.dest == node
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.source, self.source_port, self.dest, self.dest_port
        )
    }
}
