//! Depth-first ordering of task graphs.
//!
//! The walk is a post-order DFS from a root that visits children highest id
//! first, then reverses the finished sequence so prerequisites lead. It runs
//! on an explicit stack, and a child that is still on the current path is
//! reported as a cycle instead of being descended into again.

use crate::{Error, Result, TaskGraph, TaskId};
use std::fmt;
use tracing::{debug, trace};

/// A topologically sorted sequence of task ids.
///
/// For every edge `parent -> child` reachable from [`root`](Self::root),
/// the parent appears before the child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder {
    root: TaskId,
    tasks: Vec<TaskId>,
}

impl TopologicalOrder {
    /// The task the traversal started from. Always first in the sequence.
    #[must_use]
    pub fn root(&self) -> TaskId {
        self.root
    }

    /// The ordered task ids.
    #[must_use]
    pub fn as_slice(&self) -> &[TaskId] {
        &self.tasks
    }

    /// Number of tasks reachable from the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Never true for an order produced by a traversal, which holds at least the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Position of `id` in the order, if it was reachable.
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|&task| task == id)
    }

    /// Iterate over the ids in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TaskId> {
        self.tasks.iter()
    }

    /// Consume the order, returning the ids.
    #[must_use]
    pub fn into_vec(self) -> Vec<TaskId> {
        self.tasks
    }
}

impl fmt::Display for TopologicalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids = self.tasks.iter();
        if let Some(first) = ids.next() {
            write!(f, "{first}")?;
            for id in ids {
                write!(f, " {id}")?;
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TopologicalOrder {
    type Item = &'a TaskId;
    type IntoIter = std::slice::Iter<'a, TaskId>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

impl From<TopologicalOrder> for Vec<TaskId> {
    fn from(order: TopologicalOrder) -> Self {
        order.tasks
    }
}

/// A task on the current DFS path and how far through its children we are.
struct Frame {
    task: TaskId,
    children: Vec<TaskId>,
    next: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Resolved,
}

impl TaskGraph {
    /// Order every task reachable from `root` so prerequisites come first.
    ///
    /// Unreachable tasks are left out.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfRangeId`] if `root` is not in the graph.
    /// - [`Error::CycleDetected`] if a cycle is reachable from `root`.
    pub fn resolve_order(&self, root: TaskId) -> Result<TopologicalOrder> {
        self.index_of(root)?;

        // Index 0 is unused so ids index directly.
        let mut marks = vec![Mark::Unvisited; self.task_count() + 1];
        let mut resolved = Vec::with_capacity(self.task_count());
        let mut stack = vec![self.enter(root, &mut marks)];

        while let Some(frame) = stack.last_mut() {
            let Some(&child) = frame.children.get(frame.next) else {
                let task = frame.task;
                stack.pop();
                marks[task as usize] = Mark::Resolved;
                resolved.push(task);
                continue;
            };
            frame.next += 1;

            match marks[child as usize] {
                Mark::Resolved => {}
                Mark::InProgress => return Err(cycle_error(&stack, child)),
                Mark::Unvisited => {
                    let frame = self.enter(child, &mut marks);
                    stack.push(frame);
                }
            }
        }

        resolved.reverse();
        debug!(root, tasks = resolved.len(), "Resolved task order");

        Ok(TopologicalOrder {
            root,
            tasks: resolved,
        })
    }

    fn enter(&self, task: TaskId, marks: &mut [Mark]) -> Frame {
        trace!(task, "Visiting task");
        marks[task as usize] = Mark::InProgress;
        Frame {
            task,
            children: self.child_edges(task),
            next: 0,
        }
    }
}

fn cycle_error(stack: &[Frame], repeated: TaskId) -> Error {
    let start = stack
        .iter()
        .position(|frame| frame.task == repeated)
        .unwrap_or(0);
    let mut path: Vec<TaskId> = stack[start..].iter().map(|frame| frame.task).collect();
    path.push(repeated);
    debug!(?path, "Cycle found during traversal");
    Error::CycleDetected { path }
}
