//! Query system for host dependency graphs
//!
//! Provides breadth-first traversal, node filters, connection extraction and
//! typed queries layered on the traversal.

mod connections;
mod filter;
mod info;
mod traverse;
mod typed;
mod types;

pub use connections::connections;
pub use filter::{AllOf, NameFilter, NamespaceFilter, NodeFilter, PredicateFilter, TypeFilter};
pub use info::{node_info, NodeInfo};
pub use traverse::{Traversal, TraverseQuery};
pub use typed::{
    classify, dependency_network, find_by_type, find_upstream_of_type, mesh_shaders, render_tree,
    DEFAULT_TREE_DEPTH, DEPENDENCY_NETWORK_DEPTH,
};
pub use types::{Direction, NodeNetwork, VisitRecord};
