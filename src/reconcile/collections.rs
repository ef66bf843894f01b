//! Managed collection reconciliation (config repositories and SCMs)
//!
//! Both collections are owned entirely by this tool. A pass deletes every
//! existing member of the container and appends one freshly built member per
//! desired repository, in input order. Member construction is deterministic,
//! so an unchanged desired state reproduces byte-identical output even though
//! the nodes themselves are new.
//!
//! ```xml
//! <config-repos>
//!   <config-repo id="service" pluginId="yaml.config.plugin">
//!     <git url="git@github.com:acme/service.git" />
//!   </config-repo>
//! </config-repos>
//!
//! <scms>
//!   <scm id="service" name="service">
//!     <pluginConfiguration id="github.pr" version="1" />
//!     <configuration>
//!       <property><key>url</key><value>git@github.com:acme/service.git</value></property>
//!     </configuration>
//!   </scm>
//! </scms>
//! ```

use log::debug;
use xot::Node;

use crate::config::CollectionSettings;
use crate::document::ConfigDocument;
use crate::error::Result;
use crate::repository::RepositoryRef;

/// A top-level container whose members are derived from repository references.
pub trait ManagedCollection {
    /// Name of the container element under the root.
    fn container(&self) -> &'static str;

    /// Name of each member element inside the container.
    fn member(&self) -> &'static str;

    /// Build a detached member element for `repo`.
    fn build_member(&self, doc: &mut ConfigDocument, repo: &RepositoryRef) -> Result<Node>;
}

/// The `config-repos` collection, read by the YAML config plugin.
#[derive(Debug, Clone, Copy)]
pub struct ConfigRepos<'a> {
    settings: &'a CollectionSettings,
}

impl<'a> ConfigRepos<'a> {
    pub fn new(settings: &'a CollectionSettings) -> Self {
        Self { settings }
    }
}

impl ManagedCollection for ConfigRepos<'_> {
    fn container(&self) -> &'static str {
        "config-repos"
    }

    fn member(&self) -> &'static str {
        "config-repo"
    }

    fn build_member(&self, doc: &mut ConfigDocument, repo: &RepositoryRef) -> Result<Node> {
        let member = doc.new_element(self.member());
        let id = doc.name("id");
        let plugin_id = doc.name("pluginId");
        doc.set_attribute(member, id, repo.id());
        doc.set_attribute(member, plugin_id, &self.settings.config_repo_plugin);

        let git = doc.append_element(member, "git")?;
        let url = doc.name("url");
        doc.set_attribute(git, url, &repo.git_url(&self.settings.git_host));
        Ok(member)
    }
}

/// The `scms` collection of pluggable SCM materials.
#[derive(Debug, Clone, Copy)]
pub struct Scms<'a> {
    settings: &'a CollectionSettings,
}

impl<'a> Scms<'a> {
    pub fn new(settings: &'a CollectionSettings) -> Self {
        Self { settings }
    }
}

impl ManagedCollection for Scms<'_> {
    fn container(&self) -> &'static str {
        "scms"
    }

    fn member(&self) -> &'static str {
        "scm"
    }

    fn build_member(&self, doc: &mut ConfigDocument, repo: &RepositoryRef) -> Result<Node> {
        let member = doc.new_element(self.member());
        let [id, name, version] = ["id", "name", "version"].map(|n| doc.name(n));
        doc.set_attribute(member, id, repo.id());
        doc.set_attribute(member, name, repo.id());

        let plugin = doc.append_element(member, "pluginConfiguration")?;
        doc.set_attribute(plugin, id, &self.settings.scm_plugin);
        doc.set_attribute(plugin, version, &self.settings.scm_plugin_version);

        let configuration = doc.append_element(member, "configuration")?;
        let property = doc.append_element(configuration, "property")?;
        doc.append_text_element(property, "key", "url")?;
        doc.append_text_element(
            property,
            "value",
            &repo.git_url(&self.settings.git_host),
        )?;
        Ok(member)
    }
}

/// Replace every member of `collection` with one member per repository.
///
/// The container is created at its schema position when missing, even if
/// `repositories` is empty.
pub fn reconcile_collection<C: ManagedCollection>(
    doc: &mut ConfigDocument,
    collection: &C,
    repositories: &[RepositoryRef],
) -> Result<()> {
    let container = doc.ensure_section(collection.container())?;
    let member = doc.name(collection.member());

    for existing in doc.children_named(container, member) {
        debug!("Remove {}", collection.member());
        doc.remove(existing)?;
    }

    for repo in repositories {
        debug!("Add {} {}", collection.member(), repo.path());
        let node = collection.build_member(doc, repo)?;
        doc.append(container, node)?;
    }
    Ok(())
}
