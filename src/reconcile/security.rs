//! Security block reconciliation
//!
//! The `security` element under `server` is fully derived from the desired
//! state and is never merged: every pass removes whatever is there and, when
//! authentication is enabled, builds a fresh block:
//!
//! ```xml
//! <security>
//!   <authConfigs>
//!     <authConfig id="ldap" pluginId="cd.go.authentication.ldap">
//!       <property><key>Url</key><value>ldaps://x</value></property>
//!     </authConfig>
//!   </authConfigs>
//! </security>
//! ```
//!
//! There is exactly one `authConfigs` container holding exactly one
//! `authConfig` entry. List-valued properties are written as newline
//! separated text.

use log::debug;
use xot::Node;

use crate::config::SecuritySettings;
use crate::document::ConfigDocument;
use crate::error::{Error, Result};

/// Remove the existing security block and rebuild it if enabled.
pub fn reconcile_security(doc: &mut ConfigDocument, settings: &SecuritySettings) -> Result<()> {
    if settings.enabled {
        validate(settings)?;
    }

    let server = doc.server()?;
    let security = doc.name("security");
    for existing in doc.children_named(server, security) {
        debug!("Remove security block");
        doc.remove(existing)?;
    }

    if !settings.enabled {
        return Ok(());
    }

    let block = build_security(doc, settings)?;
    // The schema lists `security` first among the server children.
    doc.prepend(server, block)?;
    debug!(
        "Add authConfig {} ({} properties)",
        settings.auth_config_id,
        settings.properties.len()
    );
    Ok(())
}

fn validate(settings: &SecuritySettings) -> Result<()> {
    if settings.auth_config_id.is_empty() || settings.plugin_id.is_empty() {
        return Err(Error::Config {
            message: "security is enabled but the auth config id or plugin id is empty"
                .to_string(),
            hint: Some("Set GOCD_AUTH_CONFIG_ID and GOCD_AUTH_PLUGIN_ID".to_string()),
        });
    }
    if let Some(property) = settings.properties.iter().find(|p| p.key.is_empty()) {
        return Err(Error::Config {
            message: format!(
                "auth property with value '{}' has an empty key",
                property.value.to_text()
            ),
            hint: None,
        });
    }
    Ok(())
}

fn build_security(doc: &mut ConfigDocument, settings: &SecuritySettings) -> Result<Node> {
    let security = doc.new_element("security");
    let auth_configs = doc.append_element(security, "authConfigs")?;
    let auth_config = doc.append_element(auth_configs, "authConfig")?;

    let id = doc.name("id");
    let plugin_id = doc.name("pluginId");
    doc.set_attribute(auth_config, id, &settings.auth_config_id);
    doc.set_attribute(auth_config, plugin_id, &settings.plugin_id);

    for property in &settings.properties {
        let node = doc.append_element(auth_config, "property")?;
        doc.append_text_element(node, "key", &property.key)?;
        doc.append_text_element(node, "value", &property.value.to_text())?;
    }

    Ok(security)
}
