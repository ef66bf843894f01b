//! Writing the reconciled document
//!
//! This is the final step of a pass. It runs only after every reconciler has
//! succeeded, so a failed pass never touches the file on disk.
//!
//! 1.  **Create Directories**: Creates the parent directory of the target
//!     path if needed.
//!
//! 2.  **Write Content**: Writes the serialized document to a temporary file
//!     next to the target and renames it over the target, so an I/O failure
//!     never leaves a truncated configuration behind. The permissions of an
//!     existing target are carried over.
//!
//! Ownership and permission changes are left to the caller.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::document::ConfigDocument;
use crate::error::{Error, Result};

/// Serialize `doc` and write it to `path`, returning the written text.
pub fn execute(doc: &ConfigDocument, path: &Path) -> Result<String> {
    let xml = doc.to_xml_string().map_err(|e| Error::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write_xml(&xml, path)?;
    Ok(xml)
}

/// Write already serialized XML to `path`, replacing any existing file.
pub fn write_xml(xml: &str, path: &Path) -> Result<()> {
    let write_error = |message: String| Error::Write {
        path: path.to_path_buf(),
        message,
    };

    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|e| {
                write_error(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
            parent
        }
        None => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(parent).map_err(|e| {
        write_error(format!(
            "Failed to create temporary file in '{}': {}",
            parent.display(),
            e
        ))
    })?;
    staged
        .write_all(xml.as_bytes())
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| write_error(e.to_string()))?;

    if let Ok(metadata) = fs::metadata(path) {
        staged
            .as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| write_error(e.to_string()))?;
    }

    staged
        .persist(path)
        .map_err(|e| write_error(e.error.to_string()))?;
    Ok(())
}
