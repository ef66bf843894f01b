//! Environment reconciliation
//!
//! Unlike the managed collections, environments are pruned and topped up
//! rather than rebuilt. An environment that is still desired is left exactly
//! as it is, including any pipelines, agents or variables an operator added
//! to it by hand. Undesired environments are removed and missing ones are
//! appended as bare `<environment name="…"/>` elements.

use std::collections::HashSet;

use log::debug;

use crate::document::ConfigDocument;
use crate::error::Result;

/// Prune undesired environments, then append the missing ones.
pub fn reconcile_environments(doc: &mut ConfigDocument, desired: &[String]) -> Result<()> {
    let container = doc.ensure_section("environments")?;
    let environment = doc.name("environment");
    let name = doc.name("name");

    let wanted: HashSet<&str> = desired.iter().map(String::as_str).collect();
    let mut present = HashSet::new();

    for member in doc.children_named(container, environment) {
        match doc.attribute(member, name) {
            Some(existing) if wanted.contains(existing.as_str()) => {
                present.insert(existing);
            }
            existing => {
                debug!(
                    "Remove environment {}",
                    existing.as_deref().unwrap_or("<unnamed>")
                );
                doc.remove(member)?;
            }
        }
    }

    for env in desired {
        if present.contains(env) {
            continue;
        }
        debug!("Create environment {}", env);
        let member = doc.append_element(container, "environment")?;
        doc.set_attribute(member, name, env);
        present.insert(env.clone());
    }
    Ok(())
}
