//! Apply command implementation
//!
//! The apply command executes a full reconciliation pass:
//! 1. Load the configuration file (or the template when it does not exist)
//! 2. Run every reconciler against the desired state
//! 3. Write the result back to the configuration file
//!
//! With `--dry-run` the reconciled document is printed to stdout instead.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use log::info;

use cruise_reconcile::reconcile::{self, Mode};

use super::SettingsArgs;

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Print the reconciled document instead of writing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Execute the apply command
pub fn execute(args: ApplyArgs) -> Result<ExitCode> {
    info!("Start cruise-config.xml configuration");

    let desired = args.settings.desired_state()?;
    let mode = if args.dry_run {
        Mode::DryRun
    } else {
        Mode::Write
    };

    let outcome = reconcile::execute(
        &args.settings.config_file,
        &args.settings.template_file,
        &desired,
        mode,
    )?;

    if args.dry_run {
        print!("{}", outcome.xml);
    } else if outcome.changed {
        info!("Updated {}", args.settings.config_file.display());
    } else {
        info!("{} already up to date", args.settings.config_file.display());
    }

    info!("End cruise-config.xml configuration");
    Ok(ExitCode::SUCCESS)
}
