//! Command line definition, error types and exit codes.

use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, ValueEnum};
use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use serde::Serialize;
use std::path::PathBuf;
use taskorder_graph::TaskId;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Rule file could not be read or output could not be written
pub const EXIT_IO: i32 = 1;
/// Rule list or argument error exit code
pub const EXIT_INPUT: i32 = 2;
/// Ordering error (dependency cycle) exit code
pub const EXIT_ORDER: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// The rule list could not be parsed (exit code 2)
    #[error("Invalid rule list in {name}")]
    #[diagnostic(code(taskorder::cli::rules))]
    Rules {
        /// Display name of the input (file path or `<stdin>`)
        name: String,
        /// The underlying parse error
        #[diagnostic_source]
        source: taskorder_graph::Error,
        /// The rule text, for labelled output
        #[source_code]
        src: NamedSource<String>,
        /// Location of the offending line, when known
        #[label("here")]
        span: Option<SourceSpan>,
    },
    /// Ordering from the requested root failed (exit code 2 or 3)
    #[error("Cannot order tasks from root {root}")]
    #[diagnostic(code(taskorder::cli::order))]
    Order {
        /// The requested root task
        root: TaskId,
        /// The underlying ordering error
        #[diagnostic_source]
        source: taskorder_graph::Error,
    },
    /// Reading the rule list failed (exit code 1)
    #[error("Failed to read {name}")]
    #[diagnostic(
        code(taskorder::cli::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// Display name of the input
        name: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
    /// Encoding JSON output failed (exit code 1)
    #[error("Failed to encode output")]
    #[diagnostic(code(taskorder::cli::output))]
    Output {
        /// The underlying serialization error
        #[from]
        source: serde_json::Error,
    },
}

impl CliError {
    /// Wrap a rule parse error, labelling the offending line of `text`.
    #[must_use]
    pub fn rules(name: impl Into<String>, text: &str, source: taskorder_graph::Error) -> Self {
        let name = name.into();
        let span = error_line(&source).and_then(|line| line_span(text, line));
        Self::Rules {
            src: NamedSource::new(name.clone(), text.to_string()),
            name,
            source,
            span,
        }
    }

    /// Short machine-readable category used in JSON error envelopes.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rules { .. } => "rules",
            Self::Order { .. } => "order",
            Self::Io { .. } => "io",
            Self::Output { .. } => "output",
        }
    }
}

fn error_line(err: &taskorder_graph::Error) -> Option<usize> {
    match err {
        taskorder_graph::Error::MalformedHeader { line, .. }
        | taskorder_graph::Error::MalformedRule { line, .. } => Some(*line),
        taskorder_graph::Error::OutOfRangeId { line, .. } => *line,
        taskorder_graph::Error::RuleCountMismatch { .. }
        | taskorder_graph::Error::CycleDetected { .. } => None,
    }
}

/// Byte span of 1-based `line` in `text`, without its line terminator.
fn line_span(text: &str, line: usize) -> Option<SourceSpan> {
    let mut offset = 0;
    for (number, content) in text.split_inclusive('\n').enumerate() {
        if number + 1 == line {
            let trimmed = content.trim_end_matches(['\n', '\r']);
            return Some(SourceSpan::from((offset, trimmed.len())));
        }
        offset += content.len();
    }
    None
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Rules { .. } => EXIT_INPUT,
        CliError::Order {
            source: taskorder_graph::Error::CycleDetected { .. },
            ..
        } => EXIT_ORDER,
        CliError::Order { .. } => EXIT_INPUT,
        CliError::Io { .. } | CliError::Output { .. } => EXIT_IO,
    }
}

/// Render error appropriately based on output format
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn render_error(err: CliError, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let error_envelope = ErrorEnvelope::new(serde_json::json!({
                "code": err.code(),
                "message": err.to_string(),
                "cause": std::error::Error::source(&err).map(ToString::to_string),
            }));

            match serde_json::to_string(&error_envelope) {
                Ok(json) => println!("{json}"),
                Err(_) => eprintln!("Error serializing error response"),
            }
        }
        OutputFormat::Text => {
            // Use miette for human-friendly error display
            let report = Report::new(err);
            eprintln!("{report:?}");
        }
    }
}

/// Output format for the resolved order
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Space-separated task ids on one line
    Text,
    /// JSON envelope
    Json,
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: String,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            status: "ok".to_string(),
            data,
        }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: String,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub fn new(error: E) -> Self {
        Self {
            status: "error".to_string(),
            error,
        }
    }
}

/// Resolve task dependency rules into an execution order.
///
/// Reads a rule list (`N M` header followed by `M` lines of
/// `<task> <count> <parent>...`) and prints the tasks reachable from the
/// root so that every task comes after the tasks it depends on.
#[derive(Parser, Debug)]
#[command(name = "taskorder")]
#[command(about = "Resolve task dependency rules into an execution order")]
#[command(version)]
pub struct Cli {
    /// Rule file to read; `-` or omitted reads standard input.
    #[arg(value_name = "RULES")]
    pub rules: Option<PathBuf>,

    /// Task to start ordering from.
    #[arg(
        long,
        short = 'r',
        env = "TASKORDER_ROOT",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub root: TaskId,

    /// Output format.
    #[arg(
        long,
        short = 'o',
        help = "Output format",
        value_enum,
        default_value_t = OutputFormat::Text
    )]
    pub format: OutputFormat,

    /// Parse and validate the rules, print a summary, and skip ordering.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub log_level: LogLevel,

    /// Logging output format.
    #[arg(
        long,
        env = "TASKORDER_LOG_FORMAT",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,
}

impl Cli {
    /// Whether the rules come from standard input.
    #[must_use]
    pub fn reads_stdin(&self) -> bool {
        self.rules
            .as_ref()
            .map_or(true, |path| path.as_os_str() == "-")
    }
}

/// Parse command line arguments
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
