//! # Error Handling
//!
//! This module defines the centralized error type for `cruise-reconcile`. It
//! uses the `thiserror` library to describe every way a reconciliation pass
//! can fail.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes. Every variant is fatal: a
//!   pass that hits one of them aborts before the document is written, so
//!   the file on disk is left exactly as it was.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The failure modes are:
//!
//! - Loading errors (unreadable or malformed document or template).
//! - A document without a `server` element.
//! - Malformed repository references in the desired state.
//! - Invalid desired-state input (e.g. an unparseable property bundle).
//!   Malformed YAML in the bundle is reported this way too.
//! - Tree manipulation failures reported by the XML library.
//! - Serialization or I/O failures while writing.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for cruise-reconcile operations
#[derive(Error, Debug)]
pub enum Error {
    /// Neither the configuration file nor the template could be read or parsed.
    #[error("Failed to load configuration from {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// The document has no `server` element and is structurally invalid.
    #[error("No server configuration found. Config is invalid")]
    MissingServerNode,

    /// A desired source repository reference cannot be turned into a member.
    #[error("Invalid repository reference '{reference}': {message}")]
    InvalidRepositoryReference { reference: String, message: String },

    /// The desired state handed to the reconcilers is not usable.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the input
        hint: Option<String>,
    },

    /// The XML library rejected a tree operation.
    #[error("XML tree operation error: {operation} - {message}")]
    Xml { operation: String, message: String },

    /// The reconciled document could not be serialized or written.
    #[error("Failed to write configuration to {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Build an [`Error::Xml`] from any displayable xot error.
    pub(crate) fn xml(operation: &str, err: impl std::fmt::Display) -> Self {
        Error::Xml {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
