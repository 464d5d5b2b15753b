//! Error types for rule parsing, graph construction and ordering.

use crate::TaskId;
use miette::Diagnostic;
use thiserror::Error;

/// Result type for task graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or ordering a task graph.
///
/// Every build-time error aborts the whole build; no partial graph is
/// ever handed back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum Error {
    /// The `N M` header line is missing or invalid.
    #[error("Malformed header on line {line}: {reason}")]
    #[diagnostic(
        code(taskorder_graph::rules::malformed_header),
        help("the first line must be `<task count> <rule count>`, both at most 100")
    )]
    MalformedHeader {
        /// 1-based line number of the offending line (1 when input is empty).
        line: usize,
        /// What was wrong with the header.
        reason: String,
    },

    /// A rule line does not have the `T0 k T1 .. Tk` shape.
    #[error("Malformed rule on line {line}: {reason}")]
    #[diagnostic(
        code(taskorder_graph::rules::malformed_rule),
        help("each rule must be `<task> <parent count> <parent>...` with exactly that many parents")
    )]
    MalformedRule {
        /// 1-based line number of the offending rule.
        line: usize,
        /// What was wrong with the rule.
        reason: String,
    },

    /// A task id falls outside `1..=max`.
    #[error("Task id {id}{} is outside the valid range 1..={max}", on_line(.line))]
    #[diagnostic(code(taskorder_graph::graph::out_of_range))]
    OutOfRangeId {
        /// Source line the id came from, if it came from rule text.
        line: Option<usize>,
        /// The offending id.
        id: u64,
        /// Highest valid id in the graph.
        max: TaskId,
    },

    /// The number of rule lines differs from the count declared in the header.
    #[error("Expected {expected} rules but found {found}")]
    #[diagnostic(code(taskorder_graph::rules::rule_count_mismatch))]
    RuleCountMismatch {
        /// Rule count declared in the header.
        expected: usize,
        /// Rules actually present (stops counting at the first surplus line).
        found: usize,
    },

    /// The graph reachable from the traversal root contains a cycle.
    #[error("Cycle detected in task graph: {}", format_path(.path))]
    #[diagnostic(
        code(taskorder_graph::traversal::cycle),
        help("tasks on this path depend on each other; remove one of the rules")
    )]
    CycleDetected {
        /// Task ids forming the cycle; first and last entries are the same task.
        path: Vec<TaskId>,
    },
}

impl Error {
    /// Create a malformed header error.
    pub fn malformed_header(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            line,
            reason: reason.into(),
        }
    }

    /// Create a malformed rule error.
    pub fn malformed_rule(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRule {
            line,
            reason: reason.into(),
        }
    }

    /// Create an out-of-range error for an id that did not come from rule text.
    pub fn out_of_range(id: impl Into<u64>, max: TaskId) -> Self {
        Self::OutOfRangeId {
            line: None,
            id: id.into(),
            max,
        }
    }
}

#[allow(clippy::ref_option)]
fn on_line(line: &Option<usize>) -> String {
    line.map_or_else(String::new, |line| format!(" on line {line}"))
}

fn format_path(path: &[TaskId]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
