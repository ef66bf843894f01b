//! Integration tests for reconciliation through the library API

use cruise_reconcile::config::{DesiredState, Property, PropertyValue, ServerSettings};
use cruise_reconcile::document::ConfigDocument;
use cruise_reconcile::error::Error;
use cruise_reconcile::reconcile::reconcile;
use proptest::prelude::*;

const EXISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<cruise schemaVersion="115">
  <server artifactsdir="artifacts" serverId="d3adb33f" webhookSecret="old-secret">
    <security>
      <authConfigs>
        <authConfig id="file" pluginId="cd.go.authentication.passwordfile" />
      </authConfigs>
    </security>
  </server>
  <config-repos>
    <config-repo id="c" pluginId="yaml.config.plugin">
      <git url="git@github.com:org/c.git" />
    </config-repo>
  </config-repos>
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

fn run(xml: &str, desired: &DesiredState) -> String {
    let mut doc = ConfigDocument::parse(xml).unwrap();
    reconcile(&mut doc, desired).unwrap();
    doc.to_xml_string().unwrap()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_schema_version_is_never_lowered() {
    let desired = DesiredState {
        schema_version: "93".to_string(),
        ..DesiredState::default()
    };
    let xml = run(EXISTING, &desired);
    assert!(xml.contains(r#"schemaVersion="115""#));
}

#[test]
fn test_schema_version_set_when_missing() {
    let xml = run("<cruise><server/></cruise>", &DesiredState::default());
    assert!(xml.contains(r#"<cruise schemaVersion="93">"#));
}

#[test]
fn test_unset_server_attributes_are_removed() {
    let desired = DesiredState {
        server: ServerSettings::new()
            .with("siteUrl", Some("https://ci".to_string()))
            .with("serverId", None)
            .with("webhookSecret", None),
        ..DesiredState::default()
    };
    let xml = run(EXISTING, &desired);
    assert!(xml.contains(r#"siteUrl="https://ci""#));
    assert!(!xml.contains("serverId"));
    assert!(!xml.contains("webhookSecret"));
    // attributes not under management are left alone
    assert!(xml.contains(r#"artifactsdir="artifacts""#));
}

#[test]
fn test_security_enabled_replaces_existing_block() {
    let mut desired = DesiredState::default();
    desired.security.enabled = true;
    desired.security.properties = vec![
        Property {
            key: "Url".to_string(),
            value: PropertyValue::Single("ldaps://x".to_string()),
        },
        Property {
            key: "SearchBases".to_string(),
            value: PropertyValue::List(strings(&["ou=a", "ou=b"])),
        },
    ];

    let xml = run(EXISTING, &desired);
    assert!(!xml.contains("passwordfile"));
    assert_eq!(xml.matches("<security>").count(), 1);
    assert_eq!(xml.matches("<authConfig ").count(), 1);
    assert!(xml.contains("<value>ou=a\nou=b</value>"));
}

#[test]
fn test_security_disabled_removes_block() {
    let xml = run(EXISTING, &DesiredState::default());
    assert!(!xml.contains("<security>"));
    assert!(!xml.contains("authConfig"));
}

#[test]
fn test_collections_are_fully_replaced() {
    let desired = DesiredState {
        repositories: strings(&["org/a", "org/b.git"]),
        ..DesiredState::default()
    };
    let xml = run(EXISTING, &desired);

    assert!(!xml.contains("org/c.git"));
    assert_eq!(xml.matches("<config-repo ").count(), 2);
    assert_eq!(xml.matches("<scm ").count(), 2);
    assert!(xml.contains(r#"<git url="git@github.com:org/b.git"/>"#));
    let a = xml.find(r#"<config-repo id="a""#).unwrap();
    let b = xml.find(r#"<config-repo id="b""#).unwrap();
    assert!(a < b);
}

#[test]
fn test_empty_repository_list_empties_collections() {
    let xml = run(EXISTING, &DesiredState::default());
    assert!(!xml.contains("<config-repo "));
    assert!(xml.contains("<config-repos/>"));
    assert!(xml.contains("<scms/>"));
}

#[test]
fn test_environments_pruned_and_preserved() {
    let desired = DesiredState {
        environments: strings(&["dev", "prod"]),
        ..DesiredState::default()
    };
    let xml = run(EXISTING, &desired);

    assert!(!xml.contains("staging"));
    assert!(xml.contains(r#"<physical uuid="agent-1"/>"#));
    assert!(xml.contains(r#"<environment name="prod"/>"#));
    let dev = xml.find(r#"name="dev""#).unwrap();
    let prod = xml.find(r#"name="prod""#).unwrap();
    assert!(dev < prod);
}

#[test]
fn test_empty_repository_reference_is_rejected() {
    let desired = DesiredState {
        repositories: strings(&[""]),
        ..DesiredState::default()
    };
    let mut doc = ConfigDocument::parse(EXISTING).unwrap();
    let before = doc.to_xml_string().unwrap();

    let err = reconcile(&mut doc, &desired).unwrap_err();
    assert!(matches!(err, Error::InvalidRepositoryReference { .. }));
    assert_eq!(doc.to_xml_string().unwrap(), before);
}

#[test]
fn test_missing_server_node_is_rejected() {
    let mut doc = ConfigDocument::parse("<cruise><agents/></cruise>").unwrap();
    let err = reconcile(&mut doc, &DesiredState::default()).unwrap_err();
    assert!(matches!(err, Error::MissingServerNode));
}

#[test]
fn test_reconcile_is_idempotent() {
    let mut desired = DesiredState {
        repositories: strings(&["org/a", "org/b"]),
        environments: strings(&["dev", "prod"]),
        ..DesiredState::default()
    };
    desired.security.enabled = true;

    let first = run(EXISTING, &desired);
    let second = run(&first, &desired);
    assert_eq!(first, second);
}

#[test]
fn test_hand_formatted_environment_is_normalized_once() {
    let hand_edited = r#"<cruise><server/><environments><environment name="dev">
        <agents>      <physical uuid="agent-1"/>
   </agents></environment></environments></cruise>"#;
    let desired = DesiredState {
        environments: strings(&["dev"]),
        ..DesiredState::default()
    };

    let first = run(hand_edited, &desired);
    assert!(first.contains(r#"<physical uuid="agent-1"/>"#));
    assert!(!first.contains("<agents>      <physical"));

    let second = run(&first, &desired);
    assert_eq!(first, second);
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}"
}

proptest! {
    #[test]
    fn prop_reconcile_is_idempotent(
        repos in prop::collection::vec(name_strategy(), 0..5),
        environments in prop::collection::vec(name_strategy(), 0..5),
        security in any::<bool>(),
    ) {
        let mut repositories: Vec<String> = Vec::new();
        for repo in repos {
            if !repositories.iter().any(|r| r.ends_with(&format!("/{}", repo))) {
                repositories.push(format!("org/{}", repo));
            }
        }

        let mut desired = DesiredState {
            repositories,
            environments,
            ..DesiredState::default()
        };
        desired.security.enabled = security;

        let first = run(EXISTING, &desired);
        let second = run(&first, &desired);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_environment_set_matches_desired(
        environments in prop::collection::vec(name_strategy(), 0..6),
    ) {
        let desired = DesiredState {
            environments: environments.clone(),
            ..DesiredState::default()
        };
        let xml = run(EXISTING, &desired);

        for name in &environments {
            let needle = format!(r#"<environment name="{}""#, name);
            prop_assert_eq!(xml.matches(needle.as_str()).count(), 1);
        }
        if !environments.iter().any(|e| e == "staging") {
            prop_assert!(!xml.contains(r#"name="staging""#));
        }
    }
}
