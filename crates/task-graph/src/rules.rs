//! Parsing of the textual rule list.
//!
//! ```text
//! 5 4          <task count> <rule count>
//! 3 2 1 5      task 3 depends on 2 tasks: 1 and 5
//! 2 2 5 3
//! 4 1 3
//! 5 1 1
//! ```
//!
//! Blank lines are not skipped; they fail like any other malformed or
//! surplus line. A single trailing newline is allowed.

use crate::{Error, MAX_RULES, MAX_TASKS, Result, TaskId};
use std::str::FromStr;
use tracing::debug;

/// One parsed rule: `task` depends on every id in `prerequisites`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// 1-based line the rule was read from.
    pub line: usize,
    /// The dependent task (`T0`).
    pub task: TaskId,
    /// Tasks that must be scheduled before `task` (`T1 .. Tk`), in input order.
    pub prerequisites: Vec<TaskId>,
}

/// A fully parsed rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleList {
    /// Number of tasks declared in the header; ids run `1..=task_count`.
    pub task_count: TaskId,
    /// Number of rules declared in the header. Always equals `rules.len()`.
    pub rule_count: usize,
    /// The rules, in input order.
    pub rules: Vec<Rule>,
}

impl RuleList {
    /// Total number of dependency edges the rules describe.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.rules.iter().map(|rule| rule.prerequisites.len()).sum()
    }
}

impl FromStr for RuleList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Parse a rule list.
///
/// # Errors
///
/// - [`Error::MalformedHeader`] if the first line is missing, is not two
///   unsigned integers, declares zero tasks, or exceeds the caps.
/// - [`Error::MalformedRule`] if a rule has fewer than three tokens, a
///   non-numeric token, or a parent count that does not match its ids.
/// - [`Error::OutOfRangeId`] if a task or parent id is outside `1..=N`.
/// - [`Error::RuleCountMismatch`] if there are more or fewer rules than declared.
pub fn parse(text: &str) -> Result<RuleList> {
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

    let Some((header_line, header)) = lines.next() else {
        return Err(Error::malformed_header(1, "input is empty"));
    };
    let (task_count, rule_count) = parse_header(header_line, header)?;

    let mut rules = Vec::with_capacity(rule_count);
    for (line, text) in lines {
        if rules.len() == rule_count {
            return Err(Error::RuleCountMismatch {
                expected: rule_count,
                found: rule_count + 1,
            });
        }
        rules.push(parse_rule(line, text, task_count)?);
    }

    if rules.len() < rule_count {
        return Err(Error::RuleCountMismatch {
            expected: rule_count,
            found: rules.len(),
        });
    }

    debug!(tasks = task_count, rules = rules.len(), "Parsed rule list");
    Ok(RuleList {
        task_count,
        rule_count,
        rules,
    })
}

fn parse_header(line: usize, text: &str) -> Result<(TaskId, usize)> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [tasks, rules] = tokens.as_slice() else {
        return Err(Error::malformed_header(
            line,
            format!("expected 2 values, found {}", tokens.len()),
        ));
    };

    let tasks: usize = tasks
        .parse()
        .map_err(|_| Error::malformed_header(line, format!("task count `{tasks}` is not a number")))?;
    let rules: usize = rules
        .parse()
        .map_err(|_| Error::malformed_header(line, format!("rule count `{rules}` is not a number")))?;

    if tasks == 0 {
        return Err(Error::malformed_header(line, "task count must be at least 1"));
    }
    if tasks > MAX_TASKS {
        return Err(Error::malformed_header(
            line,
            format!("task count {tasks} exceeds the maximum of {MAX_TASKS}"),
        ));
    }
    if rules > MAX_RULES {
        return Err(Error::malformed_header(
            line,
            format!("rule count {rules} exceeds the maximum of {MAX_RULES}"),
        ));
    }

    let tasks = TaskId::try_from(tasks)
        .map_err(|_| Error::malformed_header(line, "task count does not fit a task id"))?;
    Ok((tasks, rules))
}

fn parse_rule(line: usize, text: &str, task_count: TaskId) -> Result<Rule> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(Error::malformed_rule(
            line,
            format!("expected at least 3 values, found {}", tokens.len()),
        ));
    }

    let values = tokens
        .iter()
        .map(|token| {
            token
                .parse::<u64>()
                .map_err(|_| Error::malformed_rule(line, format!("`{token}` is not a task id")))
        })
        .collect::<Result<Vec<u64>>>()?;

    let task = checked_id(line, values[0], task_count)?;

    let declared = values[1];
    let supplied = values.len() - 2;
    if u64::try_from(supplied).map_or(true, |supplied| supplied != declared) {
        return Err(Error::malformed_rule(
            line,
            format!("declares {declared} parents but lists {supplied}"),
        ));
    }

    let prerequisites = values[2..]
        .iter()
        .map(|&id| checked_id(line, id, task_count))
        .collect::<Result<Vec<_>>>()?;

    Ok(Rule {
        line,
        task,
        prerequisites,
    })
}

fn checked_id(line: usize, id: u64, max: TaskId) -> Result<TaskId> {
    TaskId::try_from(id)
        .ok()
        .filter(|&id| (1..=max).contains(&id))
        .ok_or(Error::OutOfRangeId {
            line: Some(line),
            id,
            max,
        })
}
