//! Connection extraction
//!
//! Turns the host's untagged, interleaved plug list into directed edges. The
//! direction of each pair is inferred from which plug sits on the queried
//! node: a pair that starts on the queried node is recorded as an inbound
//! link (the other plug is the source); any other pair is taken in
//! source-then-destination order.

use std::collections::HashSet;

use tracing::warn;

use crate::graph::{Edge, GraphProvider, GraphResult, NodeId, ProviderError};

/// All links touching `node`, deduplicated, in host order
///
/// A node that does not exist has no connections; the miss is logged.
pub fn connections(provider: &dyn GraphProvider, node: &NodeId) -> GraphResult<Vec<Edge>> {
    if !provider.exists(node) {
        warn!(node = %node, "cannot list connections of a missing node");
        return Ok(Vec::new());
    }

    let plugs = match provider.raw_links(node) {
        Ok(plugs) => plugs,
        Err(ProviderError::Missing(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    if plugs.len() % 2 != 0 {
        return Err(ProviderError::MalformedLinks {
            node: node.clone(),
            len: plugs.len(),
        }
        .into());
    }

    let mut seen = HashSet::new();
    let mut edges = Vec::with_capacity(plugs.len() / 2);
    for pair in plugs.chunks_exact(2) {
        let (first, second) = (pair[0].clone(), pair[1].clone());
        let edge = if &first.node == node {
            Edge::new(second, first)
        } else {
            Edge::new(first, second)
        };
        if seen.insert(edge.clone()) {
            edges.push(edge);
        }
    }
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MemoryGraph, NodeType, Plug, ProviderResult};

    /// Provider that returns a fixed plug list for every node
    struct FixedLinks(Vec<Plug>);

    impl GraphProvider for FixedLinks {
        fn exists(&self, _node: &NodeId) -> bool {
            true
        }
        fn node_type(&self, _node: &NodeId) -> ProviderResult<NodeType> {
            Ok(NodeType::from("any"))
        }
        fn upstream(&self, _node: &NodeId) -> ProviderResult<Vec<NodeId>> {
            Ok(Vec::new())
        }
        fn downstream(&self, _node: &NodeId) -> ProviderResult<Vec<NodeId>> {
            Ok(Vec::new())
        }
        fn raw_links(&self, _node: &NodeId) -> ProviderResult<Vec<Plug>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn pair_starting_on_node_is_inbound() {
        let provider = FixedLinks(vec![Plug::new("blinn1", "color"), Plug::new("file1", "outColor")]);
        let edges = connections(&provider, &NodeId::from("blinn1")).unwrap();
        assert_eq!(
            edges,
            vec![Edge::new(Plug::new("file1", "outColor"), Plug::new("blinn1", "color"))]
        );
    }

    #[test]
    fn pair_starting_elsewhere_is_source_first() {
        let provider = FixedLinks(vec![Plug::new("blinn1", "outColor"), Plug::new("sg1", "surfaceShader")]);
        let edges = connections(&provider, &NodeId::from("sg1")).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, NodeId::from("blinn1"));
        assert_eq!(edges[0].dest, NodeId::from("sg1"));
    }

    #[test]
    fn distinct_port_pairs_kept_exact_duplicates_dropped() {
        let provider = FixedLinks(vec![
            Plug::new("blinn1", "color"),
            Plug::new("file1", "outColor"),
            Plug::new("blinn1", "transparency"),
            Plug::new("file1", "outTransparency"),
            Plug::new("blinn1", "color"),
            Plug::new("file1", "outColor"),
        ]);
        let edges = connections(&provider, &NodeId::from("blinn1")).unwrap();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.source == NodeId::from("file1")));
    }

    #[test]
    fn odd_plug_list_is_malformed() {
        let provider = FixedLinks(vec![Plug::new("blinn1", "color")]);
        let err = connections(&provider, &NodeId::from("blinn1")).unwrap_err();
        assert!(err.to_string().contains("cannot form pairs"));
    }

    #[test]
    fn memory_graph_inbound_links_resolve_to_true_sources() {
        let mut g = MemoryGraph::new();
        g.add_node("file1", "file");
        g.add_node("place2d", "place2dTexture");
        g.connect(Plug::new("place2d", "outUV"), Plug::new("file1", "uvCoord"))
            .unwrap();
        g.connect(Plug::new("place2d", "outUvFilterSize"), Plug::new("file1", "uvFilterSize"))
            .unwrap();

        let edges = connections(&g, &NodeId::from("file1")).unwrap();
        assert_eq!(edges.len(), 2);
        for edge in &edges {
            assert_eq!(edge.source, NodeId::from("place2d"));
            assert_eq!(edge.dest, NodeId::from("file1"));
        }
    }

    #[test]
    fn memory_graph_outbound_link_is_reported_toward_queried_node() {
        let mut g = MemoryGraph::new();
        g.add_node("file1", "file");
        g.add_node("blinn1", "blinn");
        g.connect(Plug::new("file1", "outColor"), Plug::new("blinn1", "color"))
            .unwrap();

        // The host lists the local plug first, so the pair starts on file1 and
        // is read as inbound
        let edges = connections(&g, &NodeId::from("file1")).unwrap();
        assert_eq!(
            edges,
            vec![Edge::new(Plug::new("blinn1", "color"), Plug::new("file1", "outColor"))]
        );
        assert_eq!(edges[0].to_string(), "blinn1.color -> file1.outColor");

        // Seen from the other end the same link has its true direction
        let edges = connections(&g, &NodeId::from("blinn1")).unwrap();
        assert_eq!(edges[0].to_string(), "file1.outColor -> blinn1.color");
    }

    #[test]
    fn missing_node_has_no_connections() {
        let g = MemoryGraph::new();
        assert!(connections(&g, &NodeId::from("ghost")).unwrap().is_empty());
    }
}
