//! # Check Command Implementation
//!
//! This module implements the `check` subcommand, which reports whether the
//! configuration file on disk has drifted from the desired state.
//!
//! ## Functionality
//!
//! - **Drift Detection**: Runs a full reconciliation pass in memory and
//!   compares the result with the current file byte for byte.
//! - **Exit Codes**: Returns 0 if the file is up to date and 1 if applying
//!   would change it (or the file does not exist yet).
//!
//! This command is a safe, read-only operation that does not modify any files.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use cruise_reconcile::reconcile::{self, Mode};

use super::SettingsArgs;

/// Check whether the configuration file matches the desired state
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Execute the `check` command.
pub fn execute(args: CheckArgs) -> Result<ExitCode> {
    let path = args.settings.config_file.display();
    if has_drift(&args.settings)? {
        println!("{} would be updated", path);
        Ok(ExitCode::FAILURE)
    } else {
        println!("{} is up to date", path);
        Ok(ExitCode::SUCCESS)
    }
}

/// Whether a pass with `settings` would change the configuration file.
fn has_drift(settings: &SettingsArgs) -> Result<bool> {
    let desired = settings.desired_state()?;
    let outcome = reconcile::execute(
        &settings.config_file,
        &settings.template_file,
        &desired,
        Mode::DryRun,
    )?;
    Ok(outcome.changed)
}
