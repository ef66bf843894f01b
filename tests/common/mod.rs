//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_template(documents::TEMPLATE);
//!     fixture.command().arg("apply").assert().success();
//! }
//! ```

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::documents;
    pub use super::TestFixture;
}

/// Environment variables read by the CLI; cleared so the host environment
/// cannot leak into a test run.
const ENV_VARS: &[&str] = &[
    "LOGLEVEL",
    "GOCD_CONFIG_FILE",
    "GOCD_TEMPLATE_FILE",
    "GOCD_SCHEMAVERSION",
    "GOCD_SITEURL",
    "GOCD_SECURESITEURL",
    "GOCD_AGENTAUTOREGISTERKEY",
    "GOCD_SERVERID",
    "GOCD_WEBHOOK_SECRET",
    "GOCD_ARTIFACTSDIR",
    "GOCD_COMMANDREPOSITORYLOCATION",
    "GOCD_YAML_REPOSITORIES",
    "GOCD_YAML_ENVIRONMENTS",
    "GOCD_GIT_HOST",
    "GOCD_CONFIG_REPO_PLUGIN",
    "GOCD_SCM_PLUGIN",
    "GOCD_SECURITY_ENABLED",
    "GOCD_AUTH_CONFIG_ID",
    "GOCD_AUTH_PLUGIN_ID",
    "GOCD_AUTH_PROPERTIES",
    "GOCD_REMOVE_PIPELINES",
];

/// Common `cruise-config.xml` documents for testing.
#[allow(dead_code)]
pub mod documents {
    /// Bootstrap template as shipped with the server image.
    pub const TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<cruise>
  <server artifactsdir="artifacts" commandRepositoryLocation="default" />
</cruise>
"#;

    /// A configuration that has been edited by hand and by the server.
    pub const EXISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<cruise schemaVersion="115">
  <server artifactsdir="artifacts" serverId="d3adb33f" webhookSecret="old-secret" commandRepositoryLocation="default">
    <security>
      <authConfigs>
        <authConfig id="file" pluginId="cd.go.authentication.passwordfile">
          <property>
            <key>PasswordFilePath</key>
            <value>/etc/go/passwd</value>
          </property>
        </authConfig>
      </authConfigs>
    </security>
  </server>
  <config-repos>
    <config-repo id="c" pluginId="yaml.config.plugin">
      <git url="git@github.com:org/c.git" />
    </config-repo>
  </config-repos>
  <pipelines group="manual">
    <pipeline name="hand-made" />
  </pipelines>
  <environments>
    <environment name="dev">
      <agents>
        <physical uuid="agent-1" />
      </agents>
    </environment>
    <environment name="staging" />
  </environments>
</cruise>
"#;

    /// Malformed XML.
    pub const MALFORMED: &str = "<cruise><server></cruise>";

    /// Well-formed document without a server element.
    pub const NO_SERVER: &str = "<cruise><pipelines /></cruise>";
}

/// A test fixture with a temporary directory holding the configuration file
/// and the bootstrap template.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write the bootstrap template.
    pub fn with_template(self, content: &str) -> Self {
        self.temp_dir
            .child("cruise-config.xml.template")
            .write_str(content)
            .expect("Failed to write template");
        self
    }

    /// Write an existing configuration file.
    #[allow(dead_code)]
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child("cruise-config.xml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Get the path to the temporary directory.
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("cruise-config.xml")
    }

    /// Get the path to the bootstrap template.
    pub fn template_path(&self) -> PathBuf {
        self.temp_dir.path().join("cruise-config.xml.template")
    }

    /// Read the configuration file.
    #[allow(dead_code)]
    pub fn read_config(&self) -> String {
        std::fs::read_to_string(self.config_path()).expect("Failed to read config file")
    }

    /// A command for the `cruise-reconcile` binary with a clean environment
    /// and both paths pointing into the fixture.
    pub fn command(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("cruise-reconcile");
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd.env("GOCD_CONFIG_FILE", self.config_path())
            .env("GOCD_TEMPLATE_FILE", self.template_path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
