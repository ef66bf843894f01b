//! Scalar attribute reconciliation
//!
//! Two rules operate on fixed-path nodes:
//!
//! - the root `schemaVersion` attribute is a ratchet: it is written only when
//!   the document does not carry a version yet, so a document already
//!   upgraded by the GoCD server is never downgraded;
//! - the managed `server` attributes are set when the desired value is
//!   non-empty and removed otherwise.

use log::debug;

use crate::config::ServerSettings;
use crate::document::ConfigDocument;
use crate::error::Result;

const SCHEMA_VERSION_ATTRIBUTE: &str = "schemaVersion";

/// Set `schemaVersion` on the root element unless it already has one.
///
/// Returns `true` when the attribute was written.
pub fn set_schema_version(doc: &mut ConfigDocument, version: &str) -> Result<bool> {
    let name = doc.name(SCHEMA_VERSION_ATTRIBUTE);
    let root = doc.root();

    let current = doc.attribute(root, name).unwrap_or_default();
    if !current.is_empty() {
        debug!("Keep existing schema version {}", current);
        return Ok(false);
    }
    if version.is_empty() {
        return Ok(false);
    }

    debug!("Set schema version {}", version);
    doc.set_attribute(root, name, version);
    Ok(true)
}

/// Set or clear a single attribute on the `server` element.
pub fn set_server_attribute(
    doc: &mut ConfigDocument,
    attribute: &str,
    value: Option<&str>,
) -> Result<()> {
    let server = doc.server()?;
    let name = doc.name(attribute);

    match value.filter(|v| !v.is_empty()) {
        Some(value) => doc.set_attribute(server, name, value),
        None => {
            if doc.remove_attribute(server, name) {
                debug!("Remove server attribute {}", attribute);
            }
        }
    }
    Ok(())
}

/// Apply every managed `server` attribute.
pub fn set_server_attributes(doc: &mut ConfigDocument, settings: &ServerSettings) -> Result<()> {
    // Checked up front so an empty settings map still rejects a broken document.
    doc.server()?;

    for attribute in settings.iter() {
        set_server_attribute(doc, &attribute.name, attribute.value.as_deref())?;
    }
    Ok(())
}
