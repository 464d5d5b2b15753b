//! Validation utilities for task graphs.
//!
//! Unlike [`TaskGraph::resolve_order`], which only sees what is reachable
//! from one root, validation looks at the whole graph.

use crate::{Error, TaskGraph, TaskId};
use petgraph::algo::tarjan_scc;
use tracing::debug;

/// Result of graph validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the graph is valid (no cycles).
    pub is_valid: bool,
    /// List of validation errors, if any.
    pub errors: Vec<Error>,
}

impl ValidationResult {
    /// Create a valid result.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: vec![],
        }
    }

    /// Create an invalid result with errors.
    #[must_use]
    pub fn invalid(errors: Vec<Error>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }
}

impl TaskGraph {
    /// Validate the graph structure.
    ///
    /// Reports one [`Error::CycleDetected`] per strongly connected component
    /// that forms a cycle, including self-loops. Each reported path lists the
    /// component's tasks in ascending order, closed by repeating the first.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        if !self.has_cycles() {
            return ValidationResult::valid();
        }

        let mut cycles: Vec<Vec<TaskId>> = tarjan_scc(self.petgraph())
            .into_iter()
            .filter_map(|component| {
                let mut ids: Vec<TaskId> = component
                    .iter()
                    .map(|&n| self.petgraph()[n].id)
                    .collect();
                ids.sort_unstable();
                let cyclic = ids.len() > 1 || self.child_edges(ids[0]).contains(&ids[0]);
                cyclic.then(|| {
                    ids.push(ids[0]);
                    ids
                })
            })
            .collect();
        cycles.sort();

        debug!(cycles = cycles.len(), "Task graph failed validation");
        ValidationResult::invalid(
            cycles
                .into_iter()
                .map(|path| Error::CycleDetected { path })
                .collect(),
        )
    }
}
