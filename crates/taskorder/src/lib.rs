//! taskorder CLI library
//!
//! The binary in `main.rs` is a thin shell over [`run`]: it parses
//! arguments, installs tracing, and maps [`cli::CliError`] to exit codes.

pub mod cli;
pub mod commands;
pub mod tracing;

use cli::{Cli, CliError};

/// Load the rules named by `cli` and run the requested command.
///
/// Returns the text to write to stdout.
///
/// # Errors
///
/// Returns a [`CliError`] if the rules cannot be read, parsed or ordered.
pub fn run(cli: &Cli) -> Result<String, CliError> {
    let path = if cli.reads_stdin() {
        None
    } else {
        cli.rules.as_deref()
    };
    let (name, text) = commands::load_rules(path)?;
    commands::execute(cli, &name, &text)
}
