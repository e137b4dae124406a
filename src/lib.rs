//! graphwalk: Dependency Graph Traversal and Query Engine
//!
//! Walks a host dependency graph through a narrow provider interface and
//! answers typed questions about what feeds (or is fed by) a node. The graph
//! may contain cycles; every walk is breadth-first with an explicit visited
//! set, so it always terminates.
//!
//! # Core Concepts
//!
//! - **Provider**: the host capability supplying node existence, types and adjacency
//! - **Traversal**: a lazy, single-use breadth-first walk producing `(node, depth)` records
//! - **Filters**: accept/reject decisions that also prune the walk past rejected nodes
//! - **Fast path**: the host's own iterator, used when speed matters more than abstraction
//!
//! # Example
//!
//! ```
//! use graphwalk::{Direction, MemoryGraph, TraverseQuery};
//!
//! let mut graph = MemoryGraph::new();
//! graph.add_node("file1", "file");
//! graph.add_node("blinn1", "blinn");
//! graph.link("file1", "blinn1").unwrap();
//!
//! let visits = TraverseQuery::from("blinn1")
//!     .direction(Direction::Upstream)
//!     .collect(&graph)
//!     .unwrap();
//! assert_eq!(visits.len(), 2);
//! ```

mod graph;
pub mod native;
pub mod query;

pub use graph::{
    ConnectionSpec, Edge, GraphError, GraphProvider, GraphResult, GraphSnapshot, MemoryGraph,
    NodeId, NodeSpec, NodeType, Plug, PlugParseError, ProviderError, ProviderResult,
    ResolutionError,
};
pub use native::{DgIterator, NativeGraph, NativeTypeId};
pub use query::{
    classify, connections, dependency_network, find_by_type, find_upstream_of_type,
    mesh_shaders, node_info, render_tree, AllOf, Direction, NameFilter, NamespaceFilter, NodeFilter, NodeInfo,
    NodeNetwork, PredicateFilter, Traversal, TraverseQuery, TypeFilter, VisitRecord,
};
