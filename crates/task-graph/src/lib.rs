//! Task dependency graphs and topological ordering for taskorder.
//!
//! Tasks are identified by dense positive integers `1..=N`. A rule list
//! declares which tasks depend on which; this crate turns that list into a
//! directed graph (edges point from a prerequisite to the tasks it unlocks)
//! and walks it depth-first to produce one deterministic execution order.
//!
//! # Key Types
//!
//! - [`TaskGraph`]: arena of task nodes and their "unlocks" edges
//! - [`RuleList`] / [`Rule`]: the parsed form of the textual rule list
//! - [`Resolver`]: builds graphs from rules and orders them from a root
//! - [`TopologicalOrder`]: the resolved sequence of task ids
//!
//! # Example
//!
//! ```
//! let graph = taskorder_graph::build("5 4\n3 2 1 5\n2 2 5 3\n4 1 3\n5 1 1\n")?;
//! let order = taskorder_graph::order(&graph, 1)?;
//! assert_eq!(order.to_string(), "1 5 3 2 4");
//! # Ok::<(), taskorder_graph::Error>(())
//! ```

mod error;
mod graph;
mod resolver;
pub mod rules;
mod traversal;
mod validation;

pub use error::{Error, Result};
pub use graph::{TaskGraph, TaskNode};
pub use resolver::{Resolver, build, order};
pub use rules::{Rule, RuleList};
pub use traversal::TopologicalOrder;
pub use validation::ValidationResult;

/// Identifier of a task. Valid ids in a graph of `N` tasks are `1..=N`.
pub type TaskId = u32;

/// Largest task count a rule list may declare.
pub const MAX_TASKS: usize = 100;

/// Largest rule count a rule list may declare.
pub const MAX_RULES: usize = 100;
