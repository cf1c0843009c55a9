//! Application entry point.
//!
//! Parses command-line arguments and delegates execution to [`runner::run`].

use clap::Parser;
use dolgen::{cli::Cli, diagnostics, runner};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt;

fn main() -> ExitCode {
    let cli = Cli::parse().with_default_command();
    let max_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::ERROR
    };
    // stdout may carry the manifest itself.
    fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .init();
    match runner::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = diagnostics::error_code(&err).unwrap_or_default();
            let help = diagnostics::help_text(&err).unwrap_or_default();
            tracing::error!(
                error = %format!("{err:#}"),
                code = %code,
                help = %help,
                "generation failed"
            );
            ExitCode::FAILURE
        }
    }
}
