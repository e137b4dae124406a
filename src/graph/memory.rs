//! MemoryGraph: an in-process host graph
//!
//! Holds typed nodes and port-level connections, answers both the generic
//! [`GraphProvider`] queries and the [`NativeGraph`] fast path, and loads from
//! JSON or YAML snapshots.

use super::edge::{Edge, Plug};
use super::error::{GraphError, GraphResult, ProviderError, ProviderResult, ResolutionError};
use super::node::{NodeId, NodeType};
use super::provider::GraphProvider;
use crate::native::{NativeGraph, NativeTypeId};
use crate::query::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// A node as written in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub referenced: bool,
}

/// A connection as written in a snapshot, both ends in `node.port` form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSpec {
    pub from: String,
    pub to: String,
}

/// Serializable description of a whole graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub connections: Vec<ConnectionSpec>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node entry
    pub fn with_node(mut self, id: impl Into<NodeId>, node_type: impl Into<NodeType>) -> Self {
        self.nodes.push(NodeSpec {
            id: id.into(),
            node_type: node_type.into(),
            referenced: false,
        });
        self
    }

    /// Add a connection entry (`node.port` strings)
    pub fn with_connection(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.connections.push(ConnectionSpec {
            from: from.into(),
            to: to.into(),
        });
        self
    }
}

#[derive(Debug, Clone)]
struct MemoryNode {
    id: NodeId,
    node_type: NodeType,
    type_id: NativeTypeId,
    referenced: bool,
}

/// Indices into `MemoryGraph::edges`, in insertion order
#[derive(Debug, Clone, Default)]
struct Adjacency {
    inbound: Vec<usize>,
    outbound: Vec<usize>,
}

/// In-memory host graph
///
/// Keeps per-node adjacency so neighbor queries cost the node's degree, not
/// the size of the graph.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    nodes: Vec<MemoryNode>,
    index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    /// Parallel to `nodes`
    adjacency: Vec<Adjacency>,
    type_ids: HashMap<NodeType, NativeTypeId>,
}

impl MemoryGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or retype it if the id is already present
    pub fn add_node(&mut self, id: impl Into<NodeId>, node_type: impl Into<NodeType>) -> NodeId {
        let id = id.into();
        let node_type = node_type.into();
        let type_id = self.type_id_for(&node_type);

        match self.index.get(&id) {
            Some(&slot) => {
                let node = &mut self.nodes[slot];
                node.node_type = node_type;
                node.type_id = type_id;
            }
            None => {
                self.index.insert(id.clone(), self.nodes.len());
                self.nodes.push(MemoryNode {
                    id: id.clone(),
                    node_type,
                    type_id,
                    referenced: false,
                });
                self.adjacency.push(Adjacency::default());
            }
        }
        id
    }

    /// Mark a node as coming from a referenced source
    pub fn set_referenced(&mut self, id: &NodeId, referenced: bool) -> GraphResult<()> {
        let slot = *self
            .index
            .get(id)
            .ok_or_else(|| GraphError::NotFound(id.clone()))?;
        self.nodes[slot].referenced = referenced;
        Ok(())
    }

    /// Connect a source plug to a destination plug
    ///
    /// Both nodes must exist. Connecting the same pair of plugs twice is a no-op.
    pub fn connect(&mut self, from: Plug, to: Plug) -> GraphResult<()> {
        let source = *self
            .index
            .get(&from.node)
            .ok_or_else(|| GraphError::NotFound(from.node.clone()))?;
        let dest = *self
            .index
            .get(&to.node)
            .ok_or_else(|| GraphError::NotFound(to.node.clone()))?;

        let edge = Edge::new(from, to);
        if self.adjacency[source]
            .outbound
            .iter()
            .any(|&i| self.edges[i] == edge)
        {
            return Ok(());
        }
        let i = self.edges.len();
        self.edges.push(edge);
        self.adjacency[source].outbound.push(i);
        self.adjacency[dest].inbound.push(i);
        Ok(())
    }

    /// Connect `from.out` to `to.in`
    pub fn link(&mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> GraphResult<()> {
        self.connect(Plug::new(from, "out"), Plug::new(to, "in"))
    }

    /// Remove a connection, returning whether it existed
    pub fn disconnect(&mut self, edge: &Edge) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e != edge);
        if self.edges.len() == before {
            return false;
        }
        self.reindex();
        true
    }

    /// Remove a node and every connection touching it
    pub fn remove_node(&mut self, id: &NodeId) -> bool {
        let Some(slot) = self.index.remove(id) else {
            return false;
        };
        self.nodes.remove(slot);
        self.edges.retain(|e| !e.involves(id));
        self.reindex();
        true
    }

    /// Rebuild the id index and adjacency after a removal shifted positions
    fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        self.adjacency = vec![Adjacency::default(); self.nodes.len()];
        for (i, edge) in self.edges.iter().enumerate() {
            if let Some(&s) = self.index.get(&edge.source) {
                self.adjacency[s].outbound.push(i);
            }
            if let Some(&d) = self.index.get(&edge.dest) {
                self.adjacency[d].inbound.push(i);
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All connections in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Native type id assigned to a node type, if any node of that type was added
    pub fn native_type_id(&self, node_type: &NodeType) -> Option<NativeTypeId> {
        self.type_ids.get(node_type).copied()
    }

    fn type_id_for(&mut self, node_type: &NodeType) -> NativeTypeId {
        let next = NativeTypeId(self.type_ids.len() as u32 + 1);
        *self.type_ids.entry(node_type.clone()).or_insert(next)
    }

    /// Build a graph from a snapshot, validating every connection endpoint
    pub fn from_snapshot(snapshot: GraphSnapshot) -> GraphResult<Self> {
        let mut graph = Self::new();
        for node in snapshot.nodes {
            let id = graph.add_node(node.id, node.node_type);
            graph.set_referenced(&id, node.referenced)?;
        }
        for conn in snapshot.connections {
            let from: Plug = conn
                .from
                .parse()
                .map_err(|e| GraphError::InvalidSnapshot(format!("{}", e)))?;
            let to: Plug = conn
                .to
                .parse()
                .map_err(|e| GraphError::InvalidSnapshot(format!("{}", e)))?;
            graph.connect(from, to).map_err(|e| match e {
                GraphError::NotFound(node) => GraphError::InvalidSnapshot(format!(
                    "connection {} -> {} names unknown node {}",
                    conn.from, conn.to, node
                )),
                other => other,
            })?;
        }
        Ok(graph)
    }

    /// Describe this graph as a snapshot
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeSpec {
                    id: n.id.clone(),
                    node_type: n.node_type.clone(),
                    referenced: n.referenced,
                })
                .collect(),
            connections: self
                .edges
                .iter()
                .map(|e| ConnectionSpec {
                    from: e.source_plug().to_string(),
                    to: e.dest_plug().to_string(),
                })
                .collect(),
        }
    }

    pub fn from_json_str(json: &str) -> GraphResult<Self> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> GraphResult<Self> {
        Self::from_snapshot(serde_yaml::from_str(yaml)?)
    }

    /// Load a snapshot file; `.yaml`/`.yml` files are read as YAML, anything else as JSON
    pub fn load(path: &Path) -> GraphResult<Self> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }

    fn slot(&self, id: &NodeId) -> ProviderResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| ProviderError::Missing(id.clone()))
    }

    fn inbound(&self, slot: usize) -> impl Iterator<Item = &Edge> {
        self.adjacency[slot].inbound.iter().map(|&i| &self.edges[i])
    }

    fn outbound(&self, slot: usize) -> impl Iterator<Item = &Edge> {
        self.adjacency[slot].outbound.iter().map(|&i| &self.edges[i])
    }

    fn upstream_slots(&self, slot: usize) -> Vec<usize> {
        self.inbound(slot)
            .filter_map(|e| self.index.get(&e.source).copied())
            .collect()
    }

    fn downstream_slots(&self, slot: usize) -> Vec<usize> {
        self.outbound(slot)
            .filter_map(|e| self.index.get(&e.dest).copied())
            .collect()
    }
}

impl GraphProvider for MemoryGraph {
    fn exists(&self, node: &NodeId) -> bool {
        self.index.contains_key(node)
    }

    fn node_type(&self, node: &NodeId) -> ProviderResult<NodeType> {
        Ok(self.nodes[self.slot(node)?].node_type.clone())
    }

    fn upstream(&self, node: &NodeId) -> ProviderResult<Vec<NodeId>> {
        let slot = self.slot(node)?;
        Ok(self.inbound(slot).map(|e| e.source.clone()).collect())
    }

    fn downstream(&self, node: &NodeId) -> ProviderResult<Vec<NodeId>> {
        let slot = self.slot(node)?;
        Ok(self.outbound(slot).map(|e| e.dest.clone()).collect())
    }

    /// Local plug first, remote plug second, for every connection in insertion order
    fn raw_links(&self, node: &NodeId) -> ProviderResult<Vec<Plug>> {
        let slot = self.slot(node)?;
        let adjacency = &self.adjacency[slot];
        let mut touching: Vec<usize> = adjacency
            .inbound
            .iter()
            .chain(&adjacency.outbound)
            .copied()
            .collect();
        touching.sort_unstable();
        touching.dedup();

        let mut plugs = Vec::with_capacity(touching.len() * 2);
        for edge in touching.into_iter().map(|i| &self.edges[i]) {
            if &edge.dest == node {
                plugs.push(edge.dest_plug());
                plugs.push(edge.source_plug());
            } else if &edge.source == node {
                plugs.push(edge.source_plug());
                plugs.push(edge.dest_plug());
            }
        }
        Ok(plugs)
    }

    fn is_referenced(&self, node: &NodeId) -> ProviderResult<bool> {
        Ok(self.nodes[self.slot(node)?].referenced)
    }
}

impl NativeGraph for MemoryGraph {
    type Handle = usize;

    fn resolve_unique(&self, name: &str) -> Result<usize, ResolutionError> {
        if let Some(&slot) = self.index.get(&NodeId::from(name)) {
            return Ok(slot);
        }
        let matches: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.id.short_name() == name)
            .map(|(i, _)| i)
            .collect();
        match matches.as_slice() {
            [] => Err(ResolutionError::NoMatch(name.to_string())),
            [slot] => Ok(*slot),
            _ => Err(ResolutionError::Ambiguous {
                name: name.to_string(),
                count: matches.len(),
            }),
        }
    }

    fn native_iterate(
        &self,
        handle: &usize,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(DepthFirstWalk::new(self, *handle, direction))
    }

    fn node_id(&self, handle: &usize) -> Option<NodeId> {
        self.nodes.get(*handle).map(|n| n.id.clone())
    }

    /// Walks through every reachable node; only nodes of `type_id` are produced
    fn native_iterate_by_type(
        &self,
        handle: &usize,
        type_id: NativeTypeId,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(
            DepthFirstWalk::new(self, *handle, direction)
                .filter(move |slot| self.nodes[*slot].type_id == type_id),
        )
    }
}

/// Pre-order depth-first walk over node slots, root included
struct DepthFirstWalk<'a> {
    graph: &'a MemoryGraph,
    direction: Direction,
    stack: Vec<usize>,
    visited: HashSet<usize>,
}

impl<'a> DepthFirstWalk<'a> {
    fn new(graph: &'a MemoryGraph, root: usize, direction: Direction) -> Self {
        let stack = if root < graph.nodes.len() { vec![root] } else { Vec::new() };
        Self {
            graph,
            direction,
            stack,
            visited: HashSet::new(),
        }
    }
}

impl Iterator for DepthFirstWalk<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            let current = self.stack.pop()?;
            if !self.visited.insert(current) {
                continue;
            }

            let mut neighbors = match self.direction {
                Direction::Upstream => self.graph.upstream_slots(current),
                Direction::Downstream => self.graph.downstream_slots(current),
                Direction::Both => {
                    let mut all = self.graph.upstream_slots(current);
                    all.extend(self.graph.downstream_slots(current));
                    all
                }
            };
            neighbors.retain(|n| !self.visited.contains(n));

            // Push in reverse so the first neighbor is walked first
            self.stack.extend(neighbors.into_iter().rev());

            return Some(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shading_graph() -> MemoryGraph {
        let mut g = MemoryGraph::new();
        g.add_node("place2d", "place2dTexture");
        g.add_node("file1", "file");
        g.add_node("blinn1", "blinn");
        g.add_node("blinn1SG", "shadingEngine");
        g.connect(Plug::new("place2d", "outUV"), Plug::new("file1", "uvCoord"))
            .unwrap();
        g.connect(Plug::new("file1", "outColor"), Plug::new("blinn1", "color"))
            .unwrap();
        g.connect(Plug::new("file1", "outTransparency"), Plug::new("blinn1", "transparency"))
            .unwrap();
        g.connect(Plug::new("blinn1", "outColor"), Plug::new("blinn1SG", "surfaceShader"))
            .unwrap();
        g
    }

    #[test]
    fn adjacency_keeps_one_entry_per_port() {
        let g = shading_graph();
        let up = g.upstream(&NodeId::from("blinn1")).unwrap();
        assert_eq!(up, vec![NodeId::from("file1"), NodeId::from("file1")]);
        let down = g.downstream(&NodeId::from("blinn1")).unwrap();
        assert_eq!(down, vec![NodeId::from("blinn1SG")]);
    }

    #[test]
    fn missing_node_queries_report_missing() {
        let g = shading_graph();
        let ghost = NodeId::from("ghost");
        assert!(!g.exists(&ghost));
        assert!(matches!(g.node_type(&ghost), Err(ProviderError::Missing(_))));
        assert!(matches!(g.upstream(&ghost), Err(ProviderError::Missing(_))));
    }

    #[test]
    fn raw_links_are_local_plug_first() {
        let g = shading_graph();
        let plugs = g.raw_links(&NodeId::from("file1")).unwrap();
        assert_eq!(plugs.len(), 6);
        assert_eq!(plugs[0], Plug::new("file1", "uvCoord"));
        assert_eq!(plugs[1], Plug::new("place2d", "outUV"));
        assert_eq!(plugs[2], Plug::new("file1", "outColor"));
        assert_eq!(plugs[3], Plug::new("blinn1", "color"));
    }

    #[test]
    fn connect_rejects_unknown_nodes_and_ignores_duplicates() {
        let mut g = shading_graph();
        let err = g.link("file1", "ghost").unwrap_err();
        assert!(err.is_not_found());

        let before = g.edge_count();
        g.connect(Plug::new("file1", "outColor"), Plug::new("blinn1", "color"))
            .unwrap();
        assert_eq!(g.edge_count(), before);
    }

    #[test]
    fn remove_node_drops_its_connections() {
        let mut g = shading_graph();
        assert!(g.remove_node(&NodeId::from("file1")));
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 1);
        assert!(g.exists(&NodeId::from("blinn1SG")));
        assert_eq!(g.node_type(&NodeId::from("blinn1SG")).unwrap(), NodeType::from("shadingEngine"));
        assert!(!g.remove_node(&NodeId::from("file1")));
    }

    #[test]
    fn adjacency_follows_disconnect_and_removal() {
        let mut g = shading_graph();
        let transparency = Edge::new(
            Plug::new("file1", "outTransparency"),
            Plug::new("blinn1", "transparency"),
        );
        assert!(g.disconnect(&transparency));
        assert!(!g.disconnect(&transparency));
        assert_eq!(g.upstream(&NodeId::from("blinn1")).unwrap(), vec![NodeId::from("file1")]);
        assert_eq!(g.raw_links(&NodeId::from("file1")).unwrap().len(), 4);

        // Removing the first node shifts every position
        assert!(g.remove_node(&NodeId::from("place2d")));
        assert!(g.upstream(&NodeId::from("file1")).unwrap().is_empty());
        assert_eq!(g.downstream(&NodeId::from("file1")).unwrap(), vec![NodeId::from("blinn1")]);
        assert_eq!(
            g.upstream(&NodeId::from("blinn1SG")).unwrap(),
            vec![NodeId::from("blinn1")]
        );

        let order: Vec<NodeId> = g
            .native_iterate(&g.resolve_unique("blinn1SG").unwrap(), Direction::Upstream)
            .filter_map(|h| g.node_id(&h))
            .collect();
        assert_eq!(order, vec![NodeId::from("blinn1SG"), NodeId::from("blinn1"), NodeId::from("file1")]);

        g.connect(Plug::new("file1", "outAlpha"), Plug::new("blinn1", "diffuse")).unwrap();
        assert_eq!(g.upstream(&NodeId::from("blinn1")).unwrap().len(), 2);
    }

    #[test]
    fn self_loop_is_listed_once_in_raw_links() {
        let mut g = MemoryGraph::new();
        g.add_node("cond1", "condition");
        g.connect(Plug::new("cond1", "outColorR"), Plug::new("cond1", "firstTerm"))
            .unwrap();
        let plugs = g.raw_links(&NodeId::from("cond1")).unwrap();
        assert_eq!(plugs, vec![Plug::new("cond1", "firstTerm"), Plug::new("cond1", "outColorR")]);
        assert_eq!(g.upstream(&NodeId::from("cond1")).unwrap(), vec![NodeId::from("cond1")]);
    }

    #[test]
    fn snapshot_round_trip_through_yaml() {
        let yaml = r#"
nodes:
  - { id: a, type: transform }
  - { id: b, type: mesh, referenced: true }
connections:
  - { from: a.worldMatrix, to: b.inMatrix }
"#;
        let g = MemoryGraph::from_yaml_str(yaml).unwrap();
        assert_eq!(g.node_count(), 2);
        assert!(g.is_referenced(&NodeId::from("b")).unwrap());
        assert_eq!(g.edges()[0].dest_port, "inMatrix");

        let again = MemoryGraph::from_snapshot(g.to_snapshot()).unwrap();
        assert_eq!(again.edges(), g.edges());
    }

    #[test]
    fn snapshot_with_dangling_connection_is_invalid() {
        let snapshot = GraphSnapshot::new()
            .with_node("a", "transform")
            .with_connection("a.out", "b.in");
        let err = MemoryGraph::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, GraphError::InvalidSnapshot(_)));
    }

    #[test]
    fn resolve_by_full_id_or_unique_short_name() {
        let mut g = MemoryGraph::new();
        g.add_node("|grp1|ctrl", "transform");
        g.add_node("|grp2|ctrl", "transform");
        g.add_node("|grp2|hip", "joint");

        assert_eq!(g.resolve_unique("|grp1|ctrl"), Ok(0));
        assert_eq!(g.resolve_unique("hip"), Ok(2));
        assert_eq!(
            g.resolve_unique("ctrl"),
            Err(ResolutionError::Ambiguous { name: "ctrl".into(), count: 2 })
        );
        assert_eq!(g.resolve_unique("knee"), Err(ResolutionError::NoMatch("knee".into())));
    }

    #[test]
    fn native_walk_is_depth_first_preorder() {
        // root <- a <- a1, root <- b
        let mut g = MemoryGraph::new();
        for id in ["root", "a", "b", "a1"] {
            g.add_node(id, "node");
        }
        g.link("a", "root").unwrap();
        g.link("b", "root").unwrap();
        g.link("a1", "a").unwrap();

        let order: Vec<NodeId> = g
            .native_iterate(&0, Direction::Upstream)
            .filter_map(|h| g.node_id(&h))
            .collect();
        let expected: Vec<NodeId> = ["root", "a", "a1", "b"].into_iter().map(NodeId::from).collect();
        assert_eq!(order, expected);
        assert_eq!(g.node_id(&99), None);
    }

    #[test]
    fn native_type_ids_are_shared_per_type() {
        let g = shading_graph();
        let file = g.native_type_id(&NodeType::from("file")).unwrap();
        let blinn = g.native_type_id(&NodeType::from("blinn")).unwrap();
        assert_ne!(file, blinn);
        assert_eq!(g.native_type_id(&NodeType::from("lambert")), None);
    }
}
