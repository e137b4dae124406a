//! Shared helpers for graphwalk integration tests
//!
//! Builds random graphs and computes reference reachability independently of
//! the traversal engine.

#![allow(dead_code)]

use graphwalk::{Direction, GraphProvider, MemoryGraph, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet, VecDeque};

/// Configuration for a random test graph
#[derive(Debug, Clone)]
pub struct RandomGraphConfig {
    pub nodes: usize,
    /// Probability of a link between any ordered pair
    pub edge_probability: f64,
    /// Only link lower-numbered nodes to higher-numbered ones
    pub acyclic: bool,
    /// Node types are drawn uniformly from this list
    pub types: Vec<&'static str>,
}

impl Default for RandomGraphConfig {
    fn default() -> Self {
        Self {
            nodes: 24,
            edge_probability: 0.12,
            acyclic: false,
            types: vec!["transform", "mesh", "joint"],
        }
    }
}

impl RandomGraphConfig {
    pub fn acyclic(mut self) -> Self {
        self.acyclic = true;
        self
    }

    pub fn with_types(mut self, types: Vec<&'static str>) -> Self {
        self.types = types;
        self
    }
}

pub fn node_name(i: usize) -> String {
    format!("n{:02}", i)
}

/// Build a random graph; the same seed always builds the same graph
pub fn random_graph(seed: u64, config: &RandomGraphConfig) -> MemoryGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = MemoryGraph::new();

    for i in 0..config.nodes {
        let ty = config.types[rng.gen_range(0..config.types.len())];
        graph.add_node(node_name(i), ty);
    }
    for from in 0..config.nodes {
        for to in 0..config.nodes {
            if from == to || (config.acyclic && from > to) {
                continue;
            }
            if rng.gen_bool(config.edge_probability) {
                // Occasionally add a second port-level link between the same nodes
                let ports = if rng.gen_bool(0.2) { 2 } else { 1 };
                for p in 0..ports {
                    graph
                        .connect(
                            graphwalk::Plug::new(node_name(from), format!("out{}", p)),
                            graphwalk::Plug::new(node_name(to), format!("in{}", p)),
                        )
                        .unwrap();
                }
            }
        }
    }
    graph
}

/// Shortest distance to every node reachable from `start`, walking only through
/// nodes for which `allow` holds
pub fn reference_distances(
    graph: &MemoryGraph,
    start: &NodeId,
    direction: Direction,
    allow: impl Fn(&NodeId) -> bool,
) -> HashMap<NodeId, usize> {
    let mut dist = HashMap::new();
    if !allow(start) {
        return dist;
    }
    let mut queue = VecDeque::from([start.clone()]);
    dist.insert(start.clone(), 0);

    while let Some(node) = queue.pop_front() {
        let d = dist[&node];
        let mut next: Vec<NodeId> = Vec::new();
        if matches!(direction, Direction::Upstream | Direction::Both) {
            next.extend(graph.upstream(&node).unwrap());
        }
        if matches!(direction, Direction::Downstream | Direction::Both) {
            next.extend(graph.downstream(&node).unwrap());
        }
        for n in next {
            if allow(&n) && !dist.contains_key(&n) {
                dist.insert(n.clone(), d + 1);
                queue.push_back(n);
            }
        }
    }
    dist
}

/// Weakly connected component containing `start`
pub fn component(graph: &MemoryGraph, start: &NodeId) -> HashSet<NodeId> {
    reference_distances(graph, start, Direction::Both, |_| true)
        .into_keys()
        .collect()
}
