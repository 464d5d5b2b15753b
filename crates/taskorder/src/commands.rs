//! Command execution: load rules, build the graph, render the result.
//!
//! Everything here returns the text to print instead of printing it, so the
//! binary decides where output goes and tests can check it directly.

use crate::cli::{Cli, CliError, OkEnvelope, OutputFormat};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use taskorder_graph::{Resolver, RuleList, TaskGraph, TaskId, rules};
use tracing::{debug, info, instrument};

/// Display name used for standard input in diagnostics.
pub const STDIN_NAME: &str = "<stdin>";

/// Payload of a successful ordering run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReport {
    /// Task the traversal started from
    pub root: TaskId,
    /// Reachable tasks, prerequisites first
    pub order: Vec<TaskId>,
}

/// One rule as shown by `--dry-run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    /// Source line of the rule
    pub line: usize,
    /// The dependent task
    pub task: TaskId,
    /// Its prerequisites, in input order
    pub prerequisites: Vec<TaskId>,
}

/// Payload of a `--dry-run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DryRunReport {
    /// Declared task count
    pub tasks: TaskId,
    /// Parsed rules
    pub rules: Vec<RuleSummary>,
    /// Number of dependency edges
    pub edges: usize,
    /// Tasks with no prerequisites
    pub roots: Vec<TaskId>,
    /// Every cycle in the graph, each closed by repeating its first task
    pub cycles: Vec<Vec<TaskId>>,
}

impl DryRunReport {
    fn new(list: &RuleList, graph: &TaskGraph) -> Self {
        let cycles = graph
            .validate()
            .errors
            .into_iter()
            .filter_map(|err| match err {
                taskorder_graph::Error::CycleDetected { path } => Some(path),
                _ => None,
            })
            .collect();

        Self {
            tasks: list.task_count,
            rules: list
                .rules
                .iter()
                .map(|rule| RuleSummary {
                    line: rule.line,
                    task: rule.task,
                    prerequisites: rule.prerequisites.clone(),
                })
                .collect(),
            edges: graph.edge_count(),
            roots: graph.roots(),
            cycles,
        }
    }

    fn to_text(&self) -> String {
        let mut out = String::from("taskorder dry-run\n");
        out.push_str(&format!("  tasks: {}\n", self.tasks));
        out.push_str(&format!("  edges: {}\n", self.edges));
        out.push_str(&format!("  roots: {}\n", join_ids(&self.roots)));
        if self.cycles.is_empty() {
            out.push_str("  cycles: none\n");
        } else {
            out.push_str("  cycles:\n");
            for cycle in &self.cycles {
                out.push_str(&format!("    {}\n", join_with(cycle, " -> ")));
            }
        }
        out.push_str(&format!("\nrules ({}):\n", self.rules.len()));
        for rule in &self.rules {
            out.push_str(&format!(
                "  line {}: {} after {}\n",
                rule.line,
                rule.task,
                join_ids(&rule.prerequisites)
            ));
        }
        out
    }
}

fn join_ids(ids: &[TaskId]) -> String {
    join_with(ids, " ")
}

fn join_with(ids: &[TaskId], separator: &str) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Read the rule text named by `path`, or standard input for `None` / `-`.
///
/// Returns the display name alongside the text.
///
/// # Errors
///
/// Returns [`CliError::Io`] if reading fails.
pub fn load_rules(path: Option<&Path>) -> Result<(String, String), CliError> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let name = path.display().to_string();
            let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
                name: name.clone(),
                source,
            })?;
            Ok((name, text))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| CliError::Io {
                    name: STDIN_NAME.to_string(),
                    source,
                })?;
            Ok((STDIN_NAME.to_string(), text))
        }
    }
}

/// Run the command described by `cli` against already loaded rule text.
///
/// # Errors
///
/// Returns [`CliError::Rules`] for invalid rule text, [`CliError::Order`]
/// when ordering from the root fails, and [`CliError::Output`] if JSON
/// encoding fails.
#[instrument(skip(cli, text), fields(root = cli.root, dry_run = cli.dry_run))]
pub fn execute(cli: &Cli, name: &str, text: &str) -> Result<String, CliError> {
    let resolver = Resolver::new();
    let list = rules::parse(text).map_err(|e| CliError::rules(name, text, e))?;
    let graph = resolver
        .build_from_rules(&list)
        .map_err(|e| CliError::rules(name, text, e))?;
    info!(
        tasks = graph.task_count(),
        edges = graph.edge_count(),
        "Loaded rule list from {name}"
    );

    if cli.dry_run {
        let report = DryRunReport::new(&list, &graph);
        debug!(cycles = report.cycles.len(), "Dry run complete (no ordering)");
        return render(&report, cli.format, DryRunReport::to_text);
    }

    let order = resolver
        .order(&graph, cli.root)
        .map_err(|source| CliError::Order {
            root: cli.root,
            source,
        })?;

    let report = OrderReport {
        root: order.root(),
        order: order.into_vec(),
    };
    render(&report, cli.format, |report| {
        format!("{}\n", join_ids(&report.order))
    })
}

fn render<T: Serialize>(
    data: &T,
    format: OutputFormat,
    text: impl FnOnce(&T) -> String,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(text(data)),
        OutputFormat::Json => {
            let json = serde_json::to_string(&OkEnvelope::new(data))?;
            Ok(format!("{json}\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const SAMPLE: &str = "5 4\n3 2 1 5\n2 2 5 3\n4 1 3\n5 1 1\n";

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["taskorder"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_execute_text() {
        let out = execute(&cli(&[]), "sample", SAMPLE).unwrap();
        assert_eq!(out, "1 5 3 2 4\n");
    }

    #[test]
    fn test_execute_other_root() {
        let out = execute(&cli(&["--root", "5"]), "sample", SAMPLE).unwrap();
        assert_eq!(out, "5 3 2 4\n");
    }

    #[test]
    fn test_execute_json() {
        let out = execute(&cli(&["--format", "json"]), "sample", SAMPLE).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["data"]["root"], 1);
        assert_eq!(value["data"]["order"], serde_json::json!([1, 5, 3, 2, 4]));
    }

    #[test]
    fn test_execute_single_task() {
        assert_eq!(execute(&cli(&[]), "one", "1 0\n").unwrap(), "1\n");
    }

    #[test]
    fn test_execute_rule_error() {
        let err = execute(&cli(&[]), "bad", "3 1\n3 2 1\n").unwrap_err();
        assert!(matches!(
            err,
            CliError::Rules {
                source: taskorder_graph::Error::MalformedRule { line: 2, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_execute_root_out_of_range() {
        let err = execute(&cli(&["--root", "9"]), "sample", SAMPLE).unwrap_err();
        assert!(matches!(
            err,
            CliError::Order {
                root: 9,
                source: taskorder_graph::Error::OutOfRangeId { .. },
            }
        ));
    }

    #[test]
    fn test_execute_cycle() {
        let err = execute(&cli(&[]), "cycle", "3 3\n2 1 1\n3 1 2\n2 1 3\n").unwrap_err();
        assert_eq!(crate::cli::exit_code_for(&err), crate::cli::EXIT_ORDER);
    }

    #[test]
    fn test_dry_run_text() {
        let out = execute(&cli(&["--dry-run"]), "sample", SAMPLE).unwrap();
        assert!(out.starts_with("taskorder dry-run\n"));
        assert!(out.contains("  tasks: 5\n"));
        assert!(out.contains("  edges: 6\n"));
        assert!(out.contains("  roots: 1\n"));
        assert!(out.contains("  cycles: none\n"));
        assert!(out.contains("  line 2: 3 after 1 5\n"));
    }

    #[test]
    fn test_dry_run_reports_cycles_without_failing() {
        let out = execute(
            &cli(&["--dry-run", "--format", "json"]),
            "cycle",
            "3 3\n2 1 1\n3 1 2\n2 1 3\n",
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["data"]["cycles"], serde_json::json!([[2, 3, 2]]));
        assert_eq!(value["data"]["rules"][0]["line"], 2);
    }

    #[test]
    fn test_load_rules_missing_file() {
        let err = load_rules(Some(Path::new("/definitely/not/here.txt"))).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
