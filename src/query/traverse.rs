//! Graph traversal operations
//!
//! Breadth-first, cycle-safe walk over a [`GraphProvider`]. The walk is a lazy
//! iterator: each call to `next()` expands the previously produced node and
//! dequeues until it finds the next node to produce, so a caller that stops
//! early never pays for provider calls it did not need.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, warn};

use super::filter::{NodeFilter, TypeFilter};
use super::types::{Direction, VisitRecord};
use crate::graph::{GraphError, GraphProvider, GraphResult, NodeId, NodeType, ProviderError};

/// Query for traversing the graph from a starting node
#[derive(Debug, Clone)]
pub struct TraverseQuery {
    /// Starting node ID
    pub origin: NodeId,
    /// Maximum depth to produce and expand (`None` = unbounded, 0 = origin only)
    pub max_depth: Option<usize>,
    /// Direction to follow connections
    pub direction: Direction,
    /// Optional filter; rejected nodes are neither produced nor expanded
    pub filter: Option<Arc<dyn NodeFilter>>,
}

impl TraverseQuery {
    /// Create a new unbounded upstream traversal from a starting node
    pub fn from(origin: impl Into<NodeId>) -> Self {
        Self {
            origin: origin.into(),
            max_depth: None,
            direction: Direction::Upstream,
            filter: None,
        }
    }

    /// Set the maximum traversal depth
    pub fn depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Set the depth limit from a signed value; negative means unbounded
    pub fn depth_limit(mut self, limit: i64) -> Self {
        self.max_depth = usize::try_from(limit).ok();
        self
    }

    /// Set the traversal direction
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Only produce (and expand) nodes of the given types
    pub fn with_types<I, T>(self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeType>,
    {
        self.with_filter(TypeFilter::new(types))
    }

    /// Only produce (and expand) nodes the filter accepts
    pub fn with_filter(mut self, filter: impl NodeFilter + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Start the traversal against a provider
    ///
    /// Fails with [`GraphError::NotFound`] if the origin does not exist.
    pub fn execute<'a>(&'a self, provider: &'a dyn GraphProvider) -> GraphResult<Traversal<'a>> {
        if !provider.exists(&self.origin) {
            warn!(node = %self.origin, "traversal start node does not exist");
            return Err(GraphError::NotFound(self.origin.clone()));
        }
        Ok(Traversal::new(self, provider))
    }

    /// Run the traversal to completion
    pub fn collect(&self, provider: &dyn GraphProvider) -> GraphResult<Vec<VisitRecord>> {
        self.execute(provider)?.collect()
    }
}

/// A single pass of a breadth-first traversal
///
/// Owns its queue and visited set; both are dropped with the iterator. After a
/// provider failure is produced, the iterator is exhausted.
pub struct Traversal<'a> {
    provider: &'a dyn GraphProvider,
    query: &'a TraverseQuery,
    queue: VecDeque<(NodeId, usize)>,
    visited: HashSet<NodeId>,
    /// Last produced record, expanded on the following `next()`
    pending: Option<VisitRecord>,
    produced: usize,
    finished: bool,
}

impl<'a> Traversal<'a> {
    fn new(query: &'a TraverseQuery, provider: &'a dyn GraphProvider) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back((query.origin.clone(), 0));
        Self {
            provider,
            query,
            queue,
            visited: HashSet::new(),
            pending: None,
            produced: 0,
            finished: false,
        }
    }

    /// Number of distinct nodes dequeued so far, filtered-out nodes included
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    fn fail(&mut self, err: ProviderError) -> Option<GraphResult<VisitRecord>> {
        self.queue.clear();
        self.pending = None;
        self.finished = true;
        Some(Err(err.into()))
    }

    /// Deduplicated neighbors in the query's direction
    ///
    /// A node that vanished from the host since it was enqueued is a leaf.
    fn neighbors(&self, node: &NodeId) -> Result<Vec<NodeId>, ProviderError> {
        let mut raw = Vec::new();
        if self.query.direction.includes_upstream() {
            match self.provider.upstream(node) {
                Ok(nodes) => raw.extend(nodes),
                Err(ProviderError::Missing(_)) => return Ok(self.leaf(node)),
                Err(e) => return Err(e),
            }
        }
        if self.query.direction.includes_downstream() {
            match self.provider.downstream(node) {
                Ok(nodes) => raw.extend(nodes),
                Err(ProviderError::Missing(_)) => return Ok(self.leaf(node)),
                Err(e) => return Err(e),
            }
        }

        let mut seen = HashSet::with_capacity(raw.len());
        raw.retain(|n| seen.insert(n.clone()));
        Ok(raw)
    }

    fn leaf(&self, node: &NodeId) -> Vec<NodeId> {
        debug!(node = %node, "node vanished during traversal; treating as leaf");
        Vec::new()
    }

    fn expand(&mut self, record: VisitRecord) -> Result<(), ProviderError> {
        for neighbor in self.neighbors(&record.node)? {
            if !self.visited.contains(&neighbor) {
                self.queue.push_back((neighbor, record.depth + 1));
            }
        }
        Ok(())
    }
}

impl Iterator for Traversal<'_> {
    type Item = GraphResult<VisitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let query = self.query;

        if let Some(record) = self.pending.take() {
            if let Err(e) = self.expand(record) {
                return self.fail(e);
            }
        }

        while let Some((node, depth)) = self.queue.pop_front() {
            if self.visited.contains(&node) {
                continue;
            }
            if query.max_depth.is_some_and(|max| depth > max) {
                continue;
            }

            self.visited.insert(node.clone());

            if let Some(filter) = &query.filter {
                match filter.accepts(self.provider, &node) {
                    Ok(true) => {}
                    // Rejected nodes stay visited and are not expanded
                    Ok(false) => continue,
                    Err(ProviderError::Missing(_)) => continue,
                    Err(e) => return self.fail(e),
                }
            }

            let record = VisitRecord { node, depth };
            self.pending = Some(record.clone());
            self.produced += 1;
            return Some(Ok(record));
        }

        self.finished = true;
        debug!(
            origin = %query.origin,
            produced = self.produced,
            visited = self.visited.len(),
            "traversal complete"
        );
        None
    }
}

impl std::iter::FusedIterator for Traversal<'_> {}
