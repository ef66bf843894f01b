//! # cruise-reconcile CLI
//!
//! This is the binary entry point for the `cruise-reconcile` command-line
//! tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments and environment variables using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Logging fatal errors and turning them into a non-zero exit code.
//!
//! The reconciliation logic lives in the `lib.rs` library crate, so the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    cli.execute().unwrap_or_else(|err| {
        log::error!("{:#}", err);
        ExitCode::FAILURE
    })
}
