//! Removal of pipelines stored inline in the document
//!
//! Pipelines are delivered through config repositories, so any `pipelines`
//! group kept directly in `cruise-config.xml` is dropped.

use log::debug;

use crate::document::ConfigDocument;
use crate::error::Result;

/// Remove every top-level `pipelines` group. Returns how many were removed.
pub fn remove_pipelines(doc: &mut ConfigDocument) -> Result<usize> {
    let root = doc.root();
    let pipelines = doc.name("pipelines");

    let groups = doc.children_named(root, pipelines);
    let count = groups.len();
    for group in groups {
        debug!("Remove pipeline group");
        doc.remove(group)?;
    }
    Ok(count)
}
