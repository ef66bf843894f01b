//! # Desired State
//!
//! This module defines the desired state a reconciliation pass converges the
//! document towards. It is built once by the CLI from environment variables
//! and flags, then handed by reference to every reconciler; nothing in the
//! library reads the process environment directly.
//!
//! ## Key Components
//!
//! - **`DesiredState`**: The complete target configuration.
//! - **`ServerSettings`**: Ordered `server` attribute values. A value of
//!   `None` means "make sure the attribute is absent", which is distinct from
//!   an attribute the tool does not manage at all.
//! - **`SecuritySettings`**: The authentication toggle plus the provider
//!   id, plugin id and ordered property bundle.
//! - **`CollectionSettings`**: Plugin ids and git host used to derive config
//!   repository and SCM members.
//!
//! ## Parsing helpers
//!
//! - [`parse_list`] splits the space separated lists used for repositories
//!   and environments.
//! - [`parse_properties`] reads an inline YAML mapping such as
//!   `{Url: "ldaps://x", SearchBases: [ou=a, ou=b]}` into an ordered
//!   property list.

use serde_yaml::Value;

use crate::defaults;
use crate::error::{Error, Result};

/// Server attribute managed by the tool, with its desired value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAttribute {
    /// Attribute name on the `server` element (e.g. `siteUrl`).
    pub name: String,
    /// Desired value; `None` or an empty string removes the attribute.
    pub value: Option<String>,
}

/// Ordered set of `server` attributes the tool manages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerSettings {
    attributes: Vec<ServerAttribute>,
}

impl ServerSettings {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the desired value for `name`.
    pub fn with(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set the desired value for `name`, replacing an earlier entry in place.
    pub fn set(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(ServerAttribute { name, value }),
        }
    }

    /// Iterate over the managed attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ServerAttribute> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Value of an authentication property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// A plain string value.
    Single(String),
    /// A list value, serialized as newline separated text.
    List(Vec<String>),
}

impl PropertyValue {
    /// Text content written into the `value` element.
    pub fn to_text(&self) -> String {
        match self {
            PropertyValue::Single(value) => value.clone(),
            PropertyValue::List(values) => values.join("\n"),
        }
    }
}

/// One key/value entry of the authentication property bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: PropertyValue,
}

/// Desired state of the `security` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecuritySettings {
    /// When false the security block is removed entirely.
    pub enabled: bool,
    /// Id of the single `authConfig` entry.
    pub auth_config_id: String,
    /// Plugin backing the `authConfig` entry.
    pub plugin_id: String,
    /// Properties in the order they are emitted.
    pub properties: Vec<Property>,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            auth_config_id: defaults::AUTH_CONFIG_ID.to_string(),
            plugin_id: defaults::AUTH_PLUGIN_ID.to_string(),
            properties: Vec::new(),
        }
    }
}

/// Settings shared by the config-repo and SCM collection reconcilers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSettings {
    /// Host used in `git@host:org/repo.git` remotes.
    pub git_host: String,
    /// `pluginId` of every `config-repo` member.
    pub config_repo_plugin: String,
    /// `pluginConfiguration` id of every `scm` member.
    pub scm_plugin: String,
    /// `pluginConfiguration` version of every `scm` member.
    pub scm_plugin_version: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            git_host: defaults::GIT_HOST.to_string(),
            config_repo_plugin: defaults::CONFIG_REPO_PLUGIN.to_string(),
            scm_plugin: defaults::SCM_PLUGIN.to_string(),
            scm_plugin_version: defaults::SCM_PLUGIN_VERSION.to_string(),
        }
    }
}

/// The complete target configuration for one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    /// Written to the root `schemaVersion` attribute only when it is unset.
    pub schema_version: String,
    pub server: ServerSettings,
    pub security: SecuritySettings,
    /// Raw `org/repo` references; validated at the start of the pass.
    pub repositories: Vec<String>,
    /// Names of the environments that must exist.
    pub environments: Vec<String>,
    pub collections: CollectionSettings,
    /// Drop `pipelines` groups stored in the document itself.
    pub remove_pipelines: bool,
}

impl Default for DesiredState {
    fn default() -> Self {
        Self {
            schema_version: defaults::SCHEMA_VERSION.to_string(),
            server: ServerSettings::new(),
            security: SecuritySettings::default(),
            repositories: Vec::new(),
            environments: Vec::new(),
            collections: CollectionSettings::default(),
            remove_pipelines: true,
        }
    }
}

/// Split a space separated list, ignoring repeated and surrounding blanks.
pub fn parse_list(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

const MAPPING_HINT: &str = "Use a YAML mapping, e.g. '{Url: \"ldaps://host\"}'";

/// Parse an inline YAML mapping into an ordered property list.
///
/// Scalars become [`PropertyValue::Single`]; sequences of scalars become
/// [`PropertyValue::List`]. An empty input yields no properties.
pub fn parse_properties(input: &str) -> Result<Vec<Property>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let parsed = serde_yaml::from_str::<Value>(input).map_err(|e| Error::Config {
        message: format!("auth properties are not valid YAML: {}", e),
        hint: Some(MAPPING_HINT.to_string()),
    })?;

    let mapping = match parsed {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(mapping) => mapping,
        _ => {
            return Err(Error::Config {
                message: "auth properties must be a mapping of key to value".to_string(),
                hint: Some(MAPPING_HINT.to_string()),
            })
        }
    };

    let mut properties = Vec::with_capacity(mapping.len());
    for (key, value) in &mapping {
        let key = scalar_text(key).ok_or_else(|| Error::Config {
            message: "auth property keys must be scalars".to_string(),
            hint: None,
        })?;

        let value = match value {
            Value::Sequence(items) => {
                let items = items
                    .iter()
                    .map(|item| {
                        scalar_text(item).ok_or_else(|| Error::Config {
                            message: format!("auth property '{}' contains a non-scalar item", key),
                            hint: None,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                PropertyValue::List(items)
            }
            other => PropertyValue::Single(scalar_text(other).ok_or_else(|| Error::Config {
                message: format!("auth property '{}' has no value", key),
                hint: Some("Quote empty values: Key: \"\"".to_string()),
            })?),
        };

        properties.push(Property { key, value });
    }

    Ok(properties)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
