//! Node identity and classification in the host graph

use serde::{Deserialize, Serialize};

/// Opaque identifier naming a node in the host graph
///
/// Serializes as a plain string. Hosts may reuse an id after the node it named
/// was deleted, so ids are only meaningful at the instant they were obtained.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of a `|`-separated hierarchy path
    pub fn short_name(&self) -> &str {
        self.0.rsplit('|').next().unwrap_or(&self.0)
    }

    /// Namespace prefix (everything before the last `:`), empty when unqualified
    pub fn namespace(&self) -> &str {
        self.0.rsplit_once(':').map(|(ns, _)| ns).unwrap_or("")
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Classification tag reported by the provider
///
/// The engine never interprets it beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeType(String);

impl NodeType {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self(node_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        Self(s)
    }
}
