//! Task graph storage using petgraph.
//!
//! Nodes live in a petgraph arena; the node for task `k` is always stored at
//! `NodeIndex(k - 1)` because nodes are created densely and never removed.
//! An edge `parent -> child` means the child depends on the parent, i.e. the
//! parent "unlocks" the child.

use crate::{Error, Result, TaskId};
use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, trace};

/// A node in the task graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskNode {
    /// Id of the task.
    pub id: TaskId,
}

/// Task graph for dependency resolution and execution ordering.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    /// The directed graph of tasks; edges point from prerequisite to dependent.
    graph: DiGraph<TaskNode, ()>,
}

impl TaskGraph {
    /// Create a new empty task graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
        }
    }

    /// Create an empty graph with room for `tasks` nodes.
    #[must_use]
    pub fn with_capacity(tasks: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(tasks, tasks),
        }
    }

    /// Create a graph holding tasks `1..=count` and no edges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRangeId`] if a node cannot take its dense id.
    pub fn with_tasks(count: TaskId) -> Result<Self> {
        let mut graph = Self::with_capacity(count as usize);
        for id in 1..=count {
            graph.create_node(id)?;
        }
        debug!(tasks = count, "Created task nodes");
        Ok(graph)
    }

    /// Add the node for task `id`.
    ///
    /// Ids are dense: the only id accepted is `task_count() + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRangeId`] if `id` is not the next free id.
    pub fn create_node(&mut self, id: TaskId) -> Result<NodeIndex> {
        let next = self.max_id().saturating_add(1);
        if id != next {
            return Err(Error::out_of_range(id, next));
        }
        let index = self.graph.add_node(TaskNode { id });
        trace!(task = id, "Added task node");
        Ok(index)
    }

    /// Record that `parent` unlocks `child` (the child depends on the parent).
    ///
    /// Self-loops and duplicate edges are accepted as-is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRangeId`] if either id is not in the graph.
    pub fn add_edge(&mut self, parent: TaskId, child: TaskId) -> Result<()> {
        let from = self.index_of(parent)?;
        let to = self.index_of(child)?;
        self.graph.add_edge(from, to, ());
        trace!(parent, child, "Added dependency edge");
        Ok(())
    }

    /// Tasks unlocked by `id`, highest id first.
    ///
    /// Duplicate edges show up as repeated ids. Unknown ids have no children.
    #[must_use]
    pub fn child_edges(&self, id: TaskId) -> Vec<TaskId> {
        let Ok(index) = self.index_of(id) else {
            return Vec::new();
        };
        let mut children: Vec<TaskId> = self
            .graph
            .neighbors_directed(index, Direction::Outgoing)
            .map(|n| self.graph[n].id)
            .collect();
        children.sort_unstable_by(|a, b| b.cmp(a));
        children
    }

    /// Tasks with no prerequisites, in ascending order.
    ///
    /// Ordering from each of these covers every task of an acyclic graph.
    #[must_use]
    pub fn roots(&self) -> Vec<TaskId> {
        self.graph
            .node_indices()
            .filter(|&n| {
                self.graph
                    .neighbors_directed(n, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|n| self.graph[n].id)
            .collect()
    }

    /// Check if the graph has cycles.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Get the number of tasks in the graph.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of dependency edges, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if a task exists in the graph.
    #[must_use]
    pub fn contains_task(&self, id: TaskId) -> bool {
        self.index_of(id).is_ok()
    }

    /// Highest task id in the graph (0 for an empty graph).
    #[must_use]
    pub fn max_id(&self) -> TaskId {
        TaskId::try_from(self.graph.node_count()).unwrap_or(TaskId::MAX)
    }

    pub(crate) fn petgraph(&self) -> &DiGraph<TaskNode, ()> {
        &self.graph
    }

    pub(crate) fn index_of(&self, id: TaskId) -> Result<NodeIndex> {
        let max = self.max_id();
        if id == 0 || id > max {
            return Err(Error::out_of_range(id, max));
        }
        Ok(NodeIndex::new(id as usize - 1))
    }
}
