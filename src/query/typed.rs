//! Typed queries built on the traversal engine
//!
//! Every query here drives an unfiltered [`TraverseQuery`] and reads node
//! types after the fact, so type checks never prune the walk. A missing start
//! node gives an empty result (the traversal has already logged it); provider
//! failures propagate.

use std::collections::HashSet;

use super::connections::connections;
use super::traverse::TraverseQuery;
use super::types::{Direction, NodeNetwork, VisitRecord};
use crate::graph::{GraphError, GraphProvider, GraphResult, NodeId, NodeType, ProviderError};

/// Depth used by [`dependency_network`]
pub const DEPENDENCY_NETWORK_DEPTH: usize = 20;

/// Depth used by the CLI `tree` command when none is given
pub const DEFAULT_TREE_DEPTH: usize = 5;

const SHADING_ENGINE: &str = "shadingEngine";
const SURFACE_SHADER_PORT: &str = "surfaceShader";

/// Run a traversal, mapping a missing start to an empty walk
fn walk(query: &TraverseQuery, provider: &dyn GraphProvider) -> GraphResult<Vec<VisitRecord>> {
    match query.collect(provider) {
        Err(GraphError::NotFound(_)) => Ok(Vec::new()),
        other => other,
    }
}

/// Type of a visited node, or `None` if it vanished since it was visited
fn type_of(provider: &dyn GraphProvider, node: &NodeId) -> GraphResult<Option<NodeType>> {
    match provider.node_type(node) {
        Ok(t) => Ok(Some(t)),
        Err(ProviderError::Missing(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All nodes of `target_type` reachable from `start`, in discovery order
pub fn find_by_type(
    provider: &dyn GraphProvider,
    start: &NodeId,
    target_type: &NodeType,
    direction: Direction,
) -> GraphResult<Vec<NodeId>> {
    let query = TraverseQuery::from(start.clone()).direction(direction);
    let mut found = Vec::new();
    for record in walk(&query, provider)? {
        if type_of(provider, &record.node)?.as_ref() == Some(target_type) {
            found.push(record.node);
        }
    }
    Ok(found)
}

/// Upstream nodes of one type, e.g. the texture files feeding a shader
pub fn find_upstream_of_type(
    provider: &dyn GraphProvider,
    start: &NodeId,
    target_type: impl Into<NodeType>,
) -> GraphResult<Vec<NodeId>> {
    find_by_type(provider, start, &target_type.into(), Direction::Upstream)
}

/// Bucket every visited node by its type
pub fn classify(
    provider: &dyn GraphProvider,
    start: &NodeId,
    direction: Direction,
    max_depth: Option<usize>,
) -> GraphResult<NodeNetwork> {
    let mut query = TraverseQuery::from(start.clone()).direction(direction);
    query.max_depth = max_depth;

    let mut network = NodeNetwork::new();
    for record in walk(&query, provider)? {
        if let Some(node_type) = type_of(provider, &record.node)? {
            network.insert(node_type, record.node);
        }
    }
    Ok(network)
}

/// Everything feeding `start`, bucketed by type
pub fn dependency_network(provider: &dyn GraphProvider, start: &NodeId) -> GraphResult<NodeNetwork> {
    classify(provider, start, Direction::Upstream, Some(DEPENDENCY_NETWORK_DEPTH))
}

/// Indented listing of a traversal, one `├── node (type)` line per record
pub fn render_tree(
    provider: &dyn GraphProvider,
    start: &NodeId,
    direction: Direction,
    max_depth: Option<usize>,
) -> GraphResult<String> {
    let mut query = TraverseQuery::from(start.clone()).direction(direction);
    query.max_depth = max_depth;

    let mut out = String::new();
    for record in walk(&query, provider)? {
        let label = match type_of(provider, &record.node)? {
            Some(t) => t.to_string(),
            None => "missing".to_string(),
        };
        out.push_str(&format!(
            "{}├── {} ({})\n",
            "  ".repeat(record.depth),
            record.node,
            label
        ));
    }
    Ok(out)
}

/// Surface shaders assigned to a mesh shape, deduplicated, in discovery order
///
/// Follows the shape's direct downstream links to its shading engines, then
/// takes whatever feeds each engine's `surfaceShader` port.
pub fn mesh_shaders(provider: &dyn GraphProvider, mesh: &NodeId) -> GraphResult<Vec<NodeId>> {
    let engines = match provider.downstream(mesh) {
        Ok(nodes) => nodes,
        Err(ProviderError::Missing(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let engine_type = NodeType::from(SHADING_ENGINE);

    let mut seen = HashSet::new();
    let mut shaders = Vec::new();
    for engine in engines {
        if !seen.insert(engine.clone()) {
            continue;
        }
        if type_of(provider, &engine)?.as_ref() != Some(&engine_type) {
            continue;
        }
        for edge in connections(provider, &engine)? {
            let feeds_shader_port = edge.dest == engine && edge.dest_port == SURFACE_SHADER_PORT;
            if feeds_shader_port && seen.insert(edge.source.clone()) {
                shaders.push(edge.source);
            }
        }
    }
    Ok(shaders)
}
