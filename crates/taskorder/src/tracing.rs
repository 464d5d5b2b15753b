//! Tracing configuration for the taskorder CLI
//!
//! Logs always go to stderr so stdout carries only the resolved order.

use std::io;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Tracing output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TracingFormat {
    /// Multi-line human-readable events with targets
    Pretty,
    /// One line per event
    Compact,
    /// One JSON object per event, with span context
    Json,
}

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Every traversal step
    Trace,
    /// Graph construction and ordering summaries
    Debug,
    /// Command progress
    Info,
    /// Warnings only (default)
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// Directive spelling of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Settings taken from the command line.
#[derive(Debug, Clone, Copy)]
pub struct TracingConfig {
    /// Output format of the fmt layer
    pub format: TracingFormat,
    /// Level for the taskorder crates when `RUST_LOG` is unset
    pub level: LogLevel,
}

/// Filter directive enabling `level` for the taskorder crates only.
#[must_use]
pub fn default_directive(level: LogLevel) -> String {
    let level = level.as_str();
    format!("taskorder={level},taskorder_graph={level}")
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set and valid.
///
/// # Errors
///
/// Fails if the filter directive is invalid or a subscriber is already set.
pub fn init_tracing(config: TracingConfig) -> miette::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(config.level)))
        .map_err(|e| miette::miette!("Failed to create tracing filter: {e}"))?;

    let pretty = (config.format == TracingFormat::Pretty).then(|| {
        fmt::layer()
            .pretty()
            .with_writer(io::stderr)
            .with_target(true)
    });
    let compact = (config.format == TracingFormat::Compact).then(|| {
        fmt::layer()
            .compact()
            .with_writer(io::stderr)
            .with_target(false)
    });
    let json = (config.format == TracingFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty)
        .with(compact)
        .with(json)
        .try_init()
        .map_err(|e| miette::miette!("Failed to install tracing subscriber: {e}"))?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        level = config.level.as_str(),
        "Tracing initialized for taskorder CLI"
    );
    Ok(())
}
