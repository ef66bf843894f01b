//! Default values for cruise-reconcile.
//!
//! This module provides centralized defaults and GoCD schema constants used
//! by the CLI and the reconcilers, ensuring consistency and avoiding
//! duplication.

/// Canonical location of the GoCD server configuration.
pub const CONFIG_FILE: &str = "/etc/go/cruise-config.xml";

/// Bundled template used when no configuration exists yet.
pub const TEMPLATE_FILE: &str = "/cruise-config.xml.template";

/// Schema version written into documents that do not carry one.
pub const SCHEMA_VERSION: &str = "93";

/// Default `artifactsdir` server attribute.
pub const ARTIFACTS_DIR: &str = "artifacts";

/// Default `commandRepositoryLocation` server attribute.
pub const COMMAND_REPOSITORY_LOCATION: &str = "default";

/// Host used to build `git@host:org/repo.git` remotes.
pub const GIT_HOST: &str = "github.com";

/// Config-repository plugin that reads pipelines from YAML files.
pub const CONFIG_REPO_PLUGIN: &str = "yaml.config.plugin";

/// SCM plugin id for pull-request builds.
pub const SCM_PLUGIN: &str = "github.pr";

/// Version attribute of the SCM `pluginConfiguration` element.
pub const SCM_PLUGIN_VERSION: &str = "1";

/// Id of the single authentication config.
pub const AUTH_CONFIG_ID: &str = "ldap";

/// Plugin backing the authentication config.
pub const AUTH_PLUGIN_ID: &str = "cd.go.authentication.ldap";

/// Order of the top-level `cruise` children as mandated by the GoCD schema.
///
/// Sections created by the reconcilers are inserted before the first
/// existing sibling listed after them here.
pub const ROOT_SECTION_ORDER: &[&str] = &[
    "server",
    "elastic",
    "artifactStores",
    "secretConfigs",
    "config-repos",
    "repositories",
    "scms",
    "pipelines",
    "templates",
    "environments",
    "agents",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn position(name: &str) -> usize {
        ROOT_SECTION_ORDER
            .iter()
            .position(|n| *n == name)
            .unwrap()
    }

    #[test]
    fn test_server_comes_first() {
        assert_eq!(ROOT_SECTION_ORDER[0], "server");
    }

    #[test]
    fn test_managed_sections_are_ordered() {
        assert!(position("config-repos") < position("scms"));
        assert!(position("scms") < position("pipelines"));
        assert!(position("pipelines") < position("environments"));
        assert!(position("environments") < position("agents"));
    }
}
