//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `cruise-reconcile` command-line tool. Each subcommand is defined in its own
//! file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! Both commands share [`SettingsArgs`], the flags and environment variables
//! that describe the file locations and the desired state. Every setting can
//! be given as a flag or through the `GOCD_*` variable named in its help.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args};

use cruise_reconcile::config::{
    parse_list, parse_properties, CollectionSettings, DesiredState, SecuritySettings,
    ServerSettings,
};
use cruise_reconcile::defaults;
use cruise_reconcile::error::Result;

pub mod apply;
pub mod check;

/// File locations and desired state shared by every command
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Configuration file to reconcile.
    #[arg(long, value_name = "FILE", env = "GOCD_CONFIG_FILE", default_value = defaults::CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Template used when the configuration file does not exist.
    #[arg(long, value_name = "FILE", env = "GOCD_TEMPLATE_FILE", default_value = defaults::TEMPLATE_FILE)]
    pub template_file: PathBuf,

    /// Schema version written when the document has none.
    #[arg(long, value_name = "VERSION", env = "GOCD_SCHEMAVERSION", default_value = defaults::SCHEMA_VERSION)]
    pub schema_version: String,

    /// Server `siteUrl` attribute (removed when unset).
    #[arg(long, value_name = "URL", env = "GOCD_SITEURL")]
    pub site_url: Option<String>,

    /// Server `secureSiteUrl` attribute (removed when unset).
    #[arg(long, value_name = "URL", env = "GOCD_SECURESITEURL")]
    pub secure_site_url: Option<String>,

    /// Server `agentAutoRegisterKey` attribute (removed when unset).
    #[arg(long, value_name = "KEY", env = "GOCD_AGENTAUTOREGISTERKEY")]
    pub agent_auto_register_key: Option<String>,

    /// Server `serverId` attribute (removed when unset).
    #[arg(long, value_name = "ID", env = "GOCD_SERVERID")]
    pub server_id: Option<String>,

    /// Server `webhookSecret` attribute (removed when unset).
    #[arg(long, value_name = "SECRET", env = "GOCD_WEBHOOK_SECRET")]
    pub webhook_secret: Option<String>,

    /// Server `artifactsdir` attribute.
    #[arg(long, value_name = "DIR", env = "GOCD_ARTIFACTSDIR", default_value = defaults::ARTIFACTS_DIR)]
    pub artifacts_dir: String,

    /// Server `commandRepositoryLocation` attribute.
    #[arg(long, value_name = "LOCATION", env = "GOCD_COMMANDREPOSITORYLOCATION", default_value = defaults::COMMAND_REPOSITORY_LOCATION)]
    pub command_repository_location: String,

    /// Space separated `org/repo` references for config repositories and SCMs.
    #[arg(long, value_name = "REPOS", env = "GOCD_YAML_REPOSITORIES", default_value = "")]
    pub repositories: String,

    /// Space separated environment names.
    #[arg(long, value_name = "NAMES", env = "GOCD_YAML_ENVIRONMENTS", default_value = "")]
    pub environments: String,

    /// Host used in `git@host:org/repo.git` remotes.
    #[arg(long, value_name = "HOST", env = "GOCD_GIT_HOST", default_value = defaults::GIT_HOST)]
    pub git_host: String,

    /// Plugin id of the generated config repositories.
    #[arg(long, value_name = "ID", env = "GOCD_CONFIG_REPO_PLUGIN", default_value = defaults::CONFIG_REPO_PLUGIN)]
    pub config_repo_plugin: String,

    /// Plugin id of the generated SCM definitions.
    #[arg(long, value_name = "ID", env = "GOCD_SCM_PLUGIN", default_value = defaults::SCM_PLUGIN)]
    pub scm_plugin: String,

    /// Enable the authentication block.
    #[arg(
        long,
        value_name = "BOOL",
        env = "GOCD_SECURITY_ENABLED",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub security_enabled: bool,

    /// Id of the authentication config.
    #[arg(long, value_name = "ID", env = "GOCD_AUTH_CONFIG_ID", default_value = defaults::AUTH_CONFIG_ID)]
    pub auth_config_id: String,

    /// Plugin backing the authentication config.
    #[arg(long, value_name = "ID", env = "GOCD_AUTH_PLUGIN_ID", default_value = defaults::AUTH_PLUGIN_ID)]
    pub auth_plugin_id: String,

    /// Authentication properties as an inline YAML mapping,
    /// e.g. '{Url: "ldaps://host", SearchBases: [ou=a, ou=b]}'.
    #[arg(long, value_name = "YAML", env = "GOCD_AUTH_PROPERTIES", default_value = "{}")]
    pub auth_properties: String,

    /// Remove pipeline groups stored directly in the configuration.
    #[arg(
        long,
        value_name = "BOOL",
        env = "GOCD_REMOVE_PIPELINES",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub remove_pipelines: bool,
}

impl SettingsArgs {
    /// Build the desired state passed to the reconcilers.
    pub fn desired_state(&self) -> Result<DesiredState> {
        let server = ServerSettings::new()
            .with("artifactsdir", Some(self.artifacts_dir.clone()))
            .with("siteUrl", self.site_url.clone())
            .with("secureSiteUrl", self.secure_site_url.clone())
            .with("agentAutoRegisterKey", self.agent_auto_register_key.clone())
            .with("webhookSecret", self.webhook_secret.clone())
            .with(
                "commandRepositoryLocation",
                Some(self.command_repository_location.clone()),
            )
            .with("serverId", self.server_id.clone());

        let security = SecuritySettings {
            enabled: self.security_enabled,
            auth_config_id: self.auth_config_id.clone(),
            plugin_id: self.auth_plugin_id.clone(),
            properties: parse_properties(&self.auth_properties)?,
        };

        Ok(DesiredState {
            schema_version: self.schema_version.clone(),
            server,
            security,
            repositories: parse_list(&self.repositories),
            environments: parse_list(&self.environments),
            collections: CollectionSettings {
                git_host: self.git_host.clone(),
                config_repo_plugin: self.config_repo_plugin.clone(),
                scm_plugin: self.scm_plugin.clone(),
                ..CollectionSettings::default()
            },
            remove_pipelines: self.remove_pipelines,
        })
    }
}
