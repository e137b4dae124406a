//! Error types for graph traversal and queries

use super::node::NodeId;
use thiserror::Error;

/// Failures reported by a [`GraphProvider`](super::GraphProvider)
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The node does not exist (or no longer exists) in the host graph
    #[error("Node missing from host graph: {0}")]
    Missing(NodeId),

    /// The host returned an interleaved plug list that does not pair up
    #[error("Malformed link list for {node}: {len} plugs cannot form pairs")]
    MalformedLinks { node: NodeId, len: usize },

    /// The host query itself failed
    #[error("Host query failed: {0}")]
    Host(String),
}

/// Result type for provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Why a name could not be resolved to exactly one node
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("No node matches '{0}'")]
    NoMatch(String),

    #[error("'{name}' is ambiguous: {count} nodes match")]
    Ambiguous { name: String, count: usize },
}

/// Errors that can occur in graphwalk operations
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid graph snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GraphError::NotFound(_))
    }
}

/// Result type for graphwalk operations
pub type GraphResult<T> = Result<T, GraphError>;
