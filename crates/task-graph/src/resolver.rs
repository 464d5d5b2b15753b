//! Building task graphs from rule lists and ordering them.
//!
//! [`Resolver`] ties the two phases together: the build phase turns rule
//! text into a [`TaskGraph`], the order phase walks that graph from a root.
//! The free functions [`build`] and [`order`] are shorthands for the same.

use crate::rules::{self, RuleList};
use crate::{Result, TaskGraph, TaskId, TopologicalOrder};
use tracing::debug;

/// Builds task graphs from rule lists and resolves execution orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver;

impl Resolver {
    /// Create a resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse `text` as a rule list and build its graph.
    ///
    /// All `N` task nodes are created before any rule is applied; each rule
    /// `T0 k T1 .. Tk` adds the edges `Ti -> T0`.
    ///
    /// # Errors
    ///
    /// Returns the first parse or range error; see [`rules::parse`].
    pub fn build(&self, text: &str) -> Result<TaskGraph> {
        let rules = rules::parse(text)?;
        self.build_from_rules(&rules)
    }

    /// Build the graph for an already parsed rule list.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfRangeId`] if a rule names a task outside
    /// `1..=task_count`. Lists produced by [`rules::parse`] never do.
    pub fn build_from_rules(&self, rules: &RuleList) -> Result<TaskGraph> {
        let mut graph = TaskGraph::with_tasks(rules.task_count)?;

        for rule in &rules.rules {
            for &parent in &rule.prerequisites {
                graph.add_edge(parent, rule.task)?;
            }
        }

        debug!(
            tasks = graph.task_count(),
            edges = graph.edge_count(),
            "Built task graph from rules"
        );
        Ok(graph)
    }

    /// Order every task reachable from `root`, prerequisites first.
    ///
    /// # Errors
    ///
    /// See [`TaskGraph::resolve_order`].
    pub fn order(&self, graph: &TaskGraph, root: TaskId) -> Result<TopologicalOrder> {
        graph.resolve_order(root)
    }
}

/// Build a task graph from rule text. Shorthand for [`Resolver::build`].
///
/// # Errors
///
/// See [`Resolver::build`].
pub fn build(text: &str) -> Result<TaskGraph> {
    Resolver::new().build(text)
}

/// Order a graph from `root`. Shorthand for [`Resolver::order`].
///
/// # Errors
///
/// See [`TaskGraph::resolve_order`].
pub fn order(graph: &TaskGraph, root: TaskId) -> Result<TopologicalOrder> {
    Resolver::new().order(graph, root)
}
