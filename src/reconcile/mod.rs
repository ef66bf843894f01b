//! Reconciliation rules for `cruise-config.xml`.
//!
//! ## Overview
//!
//! A pass runs these rules, in order, over one in-memory document:
//! 1. Schema version - set the root `schemaVersion` only if unset
//! 2. Server attributes - set or clear managed `server` attributes
//! 3. Security - tear down and rebuild the authentication block
//! 4. Pipelines - drop pipeline groups kept inline (optional)
//! 5. Config repositories - replace every `config-repo` member
//! 6. SCMs - replace every `scm` member
//! 7. Environments - prune undesired, keep existing, add missing
//!
//! The writer runs after the last rule. Nothing is written when any rule
//! fails.

pub mod attributes;
pub mod collections;
pub mod environments;
pub mod orchestrator;
pub mod pipelines;
pub mod security;
pub mod write;

pub use orchestrator::{execute, reconcile, Mode, Outcome};
