//! Node filters applied during traversal
//!
//! A filter decides whether a dequeued node is produced. A rejected node is
//! also not expanded, so a filter prunes the part of the graph that is only
//! reachable through it.

use std::collections::HashSet;
use std::fmt;

use regex_lite::Regex;

use crate::graph::{GraphProvider, NodeId, NodeType, ProviderResult};

/// Accept/reject decision for a single node
pub trait NodeFilter: fmt::Debug {
    fn accepts(&self, provider: &dyn GraphProvider, node: &NodeId) -> ProviderResult<bool>;
}

/// Accepts nodes whose type is in a fixed set
#[derive(Debug, Clone, Default)]
pub struct TypeFilter {
    types: HashSet<NodeType>,
}

impl TypeFilter {
    pub fn new<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeType>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }
}

impl NodeFilter for TypeFilter {
    fn accepts(&self, provider: &dyn GraphProvider, node: &NodeId) -> ProviderResult<bool> {
        Ok(self.types.contains(&provider.node_type(node)?))
    }
}

/// Matches a regex against the node's short name
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: Regex,
    exclude: bool,
}

impl NameFilter {
    /// Accept nodes whose short name matches `pattern`
    pub fn matching(pattern: &str) -> Result<Self, regex_lite::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            exclude: false,
        })
    }

    /// Accept nodes whose short name does not match `pattern`
    pub fn excluding(pattern: &str) -> Result<Self, regex_lite::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            exclude: true,
        })
    }
}

impl NodeFilter for NameFilter {
    fn accepts(&self, _provider: &dyn GraphProvider, node: &NodeId) -> ProviderResult<bool> {
        Ok(self.pattern.is_match(node.short_name()) != self.exclude)
    }
}

/// Accepts nodes whose id contains `namespace:`
#[derive(Debug, Clone)]
pub struct NamespaceFilter {
    prefix: String,
}

impl NamespaceFilter {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            prefix: format!("{}:", namespace.into()),
        }
    }
}

impl NodeFilter for NamespaceFilter {
    fn accepts(&self, _provider: &dyn GraphProvider, node: &NodeId) -> ProviderResult<bool> {
        Ok(node.as_str().contains(&self.prefix))
    }
}

/// Wraps an arbitrary predicate over node ids
pub struct PredicateFilter<F> {
    predicate: F,
}

impl<F> PredicateFilter<F>
where
    F: Fn(&NodeId) -> bool,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> fmt::Debug for PredicateFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFilter").finish_non_exhaustive()
    }
}

impl<F> NodeFilter for PredicateFilter<F>
where
    F: Fn(&NodeId) -> bool,
{
    fn accepts(&self, _provider: &dyn GraphProvider, node: &NodeId) -> ProviderResult<bool> {
        Ok((self.predicate)(node))
    }
}

/// Accepts a node only if every inner filter does; stops at the first rejection
#[derive(Debug, Default)]
pub struct AllOf {
    filters: Vec<Box<dyn NodeFilter>>,
}

impl AllOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, filter: impl NodeFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl NodeFilter for AllOf {
    fn accepts(&self, provider: &dyn GraphProvider, node: &NodeId) -> ProviderResult<bool> {
        for filter in &self.filters {
            if !filter.accepts(provider, node)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
