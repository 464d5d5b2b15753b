//! taskorder CLI Application
//!
//! Reads a task dependency rule list and prints one execution order.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::Write;
use taskorder::cli::{self, EXIT_IO, EXIT_OK, exit_code_for, render_error};
use taskorder::tracing::{TracingConfig, init_tracing};

fn main() {
    let cli = cli::parse();

    let config = TracingConfig {
        format: cli.log_format,
        level: cli.log_level,
    };
    if let Err(e) = init_tracing(config) {
        eprintln!("{e:?}");
    }

    let exit_code = match taskorder::run(&cli) {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            match stdout.write_all(output.as_bytes()).and_then(|()| stdout.flush()) {
                Ok(()) => EXIT_OK,
                Err(e) => {
                    eprintln!("Failed to write output: {e}");
                    EXIT_IO
                }
            }
        }
        Err(err) => {
            let code = exit_code_for(&err);
            tracing::debug!(code, "Command failed");
            render_error(err, cli.format);
            code
        }
    };

    std::process::exit(exit_code);
}
