//! Property-based tests for task ordering invariants.
//!
//! These tests verify the behavioral contracts of the resolver:
//! - Every reachable dependency edge points forward in the order
//! - The order holds exactly the reachable tasks, each once
//! - Ordering is deterministic
//! - Cycles are reported instead of overflowing the stack

use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};
use taskorder_graph::{Error, TaskGraph, TaskId};

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Generate rules for an acyclic graph of `1..=max_tasks` tasks.
///
/// Each task may only depend on tasks with lower ids, so no cycles exist.
/// Returns the task count and `(task, prerequisites)` pairs.
fn dag_rules_strategy(max_tasks: TaskId) -> impl Strategy<Value = (TaskId, Vec<(TaskId, Vec<TaskId>)>)> {
    (1..=max_tasks).prop_flat_map(|task_count| {
        let rule_strategies: Vec<_> = (2..=task_count)
            .map(|task| {
                proptest::collection::vec(1..task, 0..=3)
                    .prop_map(move |prerequisites| (task, prerequisites))
                    .boxed()
            })
            .collect();

        rule_strategies.prop_map(move |rules| {
            let rules = rules
                .into_iter()
                .filter(|(_, prerequisites)| !prerequisites.is_empty())
                .collect::<Vec<_>>();
            (task_count, rules)
        })
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Render rules in the textual rule-list format.
fn render_rules(task_count: TaskId, rules: &[(TaskId, Vec<TaskId>)]) -> String {
    let mut text = format!("{task_count} {}\n", rules.len());
    for (task, prerequisites) in rules {
        let ids = prerequisites
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        text.push_str(&format!("{task} {} {ids}\n", prerequisites.len()));
    }
    text
}

/// Tasks reachable from `root` by following child edges.
fn reachable(graph: &TaskGraph, root: TaskId) -> HashSet<TaskId> {
    let mut seen = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    while let Some(task) = queue.pop_front() {
        for child in graph.child_edges(task) {
            if seen.insert(child) {
                queue.push_back(child);
            }
        }
    }
    seen
}

// =============================================================================
// Property Tests: Ordering
// =============================================================================

proptest! {
    /// Contract: every edge reachable from the root points forward.
    #[test]
    fn order_respects_dependencies(
        (task_count, rules) in dag_rules_strategy(30),
        root_seed in any::<prop::sample::Index>()
    ) {
        let graph = taskorder_graph::build(&render_rules(task_count, &rules))
            .expect("Graph should build successfully");
        let root = TaskId::try_from(root_seed.index(task_count as usize)).unwrap() + 1;

        let order = taskorder_graph::order(&graph, root).expect("Order should succeed for DAG");

        for (task, prerequisites) in &rules {
            let Some(task_pos) = order.position(*task) else { continue };
            for parent in prerequisites {
                if let Some(parent_pos) = order.position(*parent) {
                    prop_assert!(
                        parent_pos < task_pos,
                        "Prerequisite {} (pos {}) should come before {} (pos {})",
                        parent, parent_pos, task, task_pos
                    );
                }
            }
        }
    }

    /// Contract: the order holds exactly the reachable tasks, each once.
    #[test]
    fn order_is_complete_over_reachable_tasks(
        (task_count, rules) in dag_rules_strategy(30)
    ) {
        let graph = taskorder_graph::build(&render_rules(task_count, &rules))
            .expect("Graph should build successfully");

        for root in graph.roots() {
            let order = graph.resolve_order(root).expect("Order should succeed");
            let expected = reachable(&graph, root);

            prop_assert_eq!(order.len(), expected.len(), "No task may repeat");
            let seen: HashSet<TaskId> = order.iter().copied().collect();
            prop_assert_eq!(seen, expected);
            prop_assert_eq!(order.as_slice()[0], root);
        }
    }

    /// Contract: ordering from task 1 never leaves its reachable set.
    #[test]
    fn ordered_tasks_are_reachable_from_root(
        (task_count, rules) in dag_rules_strategy(20)
    ) {
        let graph = taskorder_graph::build(&render_rules(task_count, &rules))
            .expect("Graph should build successfully");
        let order = graph.resolve_order(1).expect("Order should succeed");
        let reached = reachable(&graph, 1);

        for task in &order {
            prop_assert!(reached.contains(task));
        }
    }

    /// Contract: identical input and root give identical output.
    #[test]
    fn order_is_deterministic(
        (task_count, rules) in dag_rules_strategy(30)
    ) {
        let text = render_rules(task_count, &rules);
        let first = taskorder_graph::build(&text).unwrap().resolve_order(1).unwrap();
        let second = taskorder_graph::build(&text).unwrap().resolve_order(1).unwrap();

        prop_assert_eq!(first.to_string(), second.to_string());
    }

    /// Contract: rule order in the input does not change the result.
    #[test]
    fn order_ignores_rule_order(
        (task_count, rules) in dag_rules_strategy(30)
    ) {
        let forward = taskorder_graph::build(&render_rules(task_count, &rules)).unwrap();
        let reversed_rules: Vec<_> = rules.iter().rev().cloned().collect();
        let backward = taskorder_graph::build(&render_rules(task_count, &reversed_rules)).unwrap();

        prop_assert_eq!(
            forward.resolve_order(1).unwrap(),
            backward.resolve_order(1).unwrap()
        );
    }
}

// =============================================================================
// Property Tests: Cycle Detection
// =============================================================================

proptest! {
    /// Contract: a ring of tasks is always reported as a cycle.
    #[test]
    fn ring_is_reported_as_cycle(ring_len in 1..=60_u32) {
        let mut graph = TaskGraph::with_tasks(ring_len).unwrap();
        for task in 1..=ring_len {
            let next = if task == ring_len { 1 } else { task + 1 };
            graph.add_edge(task, next).unwrap();
        }

        prop_assert!(graph.has_cycles());
        prop_assert!(!graph.validate().is_valid);

        match graph.resolve_order(1) {
            Err(Error::CycleDetected { path }) => {
                prop_assert_eq!(path.len(), ring_len as usize + 1);
                prop_assert_eq!(path.first(), path.last());
            }
            other => prop_assert!(false, "expected cycle error, got {:?}", other),
        }
    }

    /// Contract: acyclic graphs always validate.
    #[test]
    fn dag_validates(
        (task_count, rules) in dag_rules_strategy(30)
    ) {
        let graph = taskorder_graph::build(&render_rules(task_count, &rules)).unwrap();
        prop_assert!(!graph.has_cycles());
        prop_assert!(graph.validate().is_valid);
    }
}
