//! CLI argument parsing and command dispatch

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;

/// Reconcile a GoCD cruise-config.xml with settings taken from the environment
#[derive(Parser, Debug)]
#[command(name = "cruise-reconcile")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        env = "LOGLEVEL",
        default_value = "info"
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile the configuration and write it back
    Apply(commands::apply::ApplyArgs),

    /// Report whether applying would change the configuration file
    Check(commands::check::CheckArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<ExitCode> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Apply(args) => commands::apply::execute(args),
            Commands::Check(args) => commands::check::execute(args),
        }
    }
}

fn init_logging(level: &str) {
    env_logger::Builder::new()
        .filter_level(level_filter(level))
        .format_target(false)
        .init();
}

/// Level named by `--log-level`/`LOGLEVEL`; unknown names fall back to info.
fn level_filter(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}
