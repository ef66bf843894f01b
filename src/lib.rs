//! # cruise-reconcile
//!
//! This library converges a GoCD `cruise-config.xml` document towards a
//! desired state. It is used by the `cruise-reconcile` command-line tool,
//! which builds the desired state from environment variables at container
//! start, but the reconcilers work on any in-memory document.
//!
//! ## Quick Example
//!
//! ```
//! use cruise_reconcile::config::DesiredState;
//! use cruise_reconcile::document::ConfigDocument;
//! use cruise_reconcile::reconcile;
//!
//! let mut doc = ConfigDocument::parse("<cruise><server/></cruise>").unwrap();
//!
//! let desired = DesiredState {
//!     repositories: vec!["acme/pipelines".to_string()],
//!     environments: vec!["production".to_string()],
//!     ..DesiredState::default()
//! };
//! reconcile::reconcile(&mut doc, &desired).unwrap();
//!
//! let xml = doc.to_xml_string().unwrap();
//! assert!(xml.contains("git@github.com:acme/pipelines.git"));
//! assert!(xml.contains(r#"<environment name="production"/>"#));
//! ```
//!
//! ## Core Concepts
//!
//! - **Desired state (`config`)**: The explicit, already-validated target
//!   configuration passed to every reconciler.
//! - **Document (`document`)**: The parsed XML tree plus the helpers the
//!   reconcilers use to query and mutate it.
//! - **Repository references (`repository`)**: Validation of `org/repo`
//!   references and derivation of member ids and remote URLs.
//! - **Reconcilers (`reconcile`)**: One module per rule, run in a fixed order
//!   by the orchestrator, followed by the writer.
//!
//! ## Execution Flow
//!
//! 1.  **Load**: Parse the existing configuration, or the template when none
//!     exists.
//! 2.  **Reconcile**: Schema version, server attributes, security block,
//!     inline pipelines, config repositories, SCMs, environments.
//! 3.  **Write**: Serialize with a stable layout and overwrite the file.
//!
//! Every failure aborts the pass before the write, leaving the previous file
//! untouched.

pub mod config;
pub mod defaults;
pub mod document;
pub mod error;
pub mod reconcile;
pub mod repository;
