//! Core graph data structures and the host boundary

mod edge;
mod error;
mod memory;
mod node;
mod provider;


pub use edge::{Edge, Plug, PlugParseError};
pub use error::{GraphError, GraphResult, ProviderError, ProviderResult, ResolutionError};
pub use memory::{ConnectionSpec, GraphSnapshot, MemoryGraph, NodeSpec};
pub use node::{NodeId, NodeType};
pub use provider::GraphProvider;
