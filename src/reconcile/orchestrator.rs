//! Orchestrator for a complete reconciliation pass
//!
//! This module coordinates the loader, every reconciler and the writer. The
//! reconcilers run in a fixed order against one in-memory document; the
//! write happens last, so any error leaves the file on disk untouched.

use std::fs;
use std::path::Path;

use log::info;

use super::{attributes, collections, environments, pipelines, security, write};
use crate::config::DesiredState;
use crate::document::ConfigDocument;
use crate::error::Result;
use crate::repository;

/// What to do with the reconciled document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Write the document back to the configuration path.
    Write,
    /// Only compute the document; nothing is written.
    DryRun,
}

/// Result of a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The reconciled document as written (or as it would be written).
    pub xml: String,
    /// Whether `xml` differs from the file that existed before the pass.
    pub changed: bool,
    /// Whether the file was written.
    pub written: bool,
}

/// Apply every reconciler to `doc`, in order.
///
/// Repository references are validated before the first mutation.
pub fn reconcile(doc: &mut ConfigDocument, desired: &DesiredState) -> Result<()> {
    let repositories = repository::parse_all(&desired.repositories)?;

    info!("Set Schema Version");
    attributes::set_schema_version(doc, &desired.schema_version)?;

    info!("Set Server Configuration");
    attributes::set_server_attributes(doc, &desired.server)?;

    info!("Set Security Configuration");
    security::reconcile_security(doc, &desired.security)?;

    if desired.remove_pipelines {
        info!("Remove Pipeline Configurations");
        pipelines::remove_pipelines(doc)?;
    }

    info!("Replace Configuration Repositories");
    collections::reconcile_collection(
        doc,
        &collections::ConfigRepos::new(&desired.collections),
        &repositories,
    )?;

    info!("Replace SCM Definitions");
    collections::reconcile_collection(
        doc,
        &collections::Scms::new(&desired.collections),
        &repositories,
    )?;

    info!("Reconcile Environments");
    environments::reconcile_environments(doc, &desired.environments)?;

    Ok(())
}

/// Execute a complete pass: load, reconcile, and (in [`Mode::Write`]) write.
pub fn execute(
    config_file: &Path,
    template_file: &Path,
    desired: &DesiredState,
    mode: Mode,
) -> Result<Outcome> {
    let previous = fs::read_to_string(config_file).ok();

    let mut doc = ConfigDocument::load(config_file, template_file)?;
    reconcile(&mut doc, desired)?;

    let xml = match mode {
        Mode::Write => {
            info!("Write XML configuration {}", config_file.display());
            write::execute(&doc, config_file)?
        }
        Mode::DryRun => doc.to_xml_string()?,
    };

    Ok(Outcome {
        changed: previous.as_deref() != Some(xml.as_str()),
        written: mode == Mode::Write,
        xml,
    })
}
