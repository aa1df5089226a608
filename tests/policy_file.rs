use std::fs;

use anyhow::Result;
use campus_authz::authz::{permissions, Policy, Role};
use campus_authz::config::AuthzConfig;
use campus_authz::{AuthorizationSession, Authorizer, AuthzError};
use serde_json::json;
use tempfile::tempdir;

fn write_policy(value: serde_json::Value) -> Result<(tempfile::TempDir, std::path::PathBuf)> {
    let dir = tempdir()?;
    let path = dir.path().join("policy.json");
    fs::write(&path, serde_json::to_string_pretty(&value)?)?;
    Ok((dir, path))
}

#[test]
fn custom_policy_file_is_loaded_through_config() -> Result<()> {
    let (_dir, path) = write_policy(json!({
        "catalog": ["library.borrow", "library.manage", "system.manage_settings"],
        "roles": {
            "1": ["library.borrow"],
            "6": "*"
        },
        "features": { "library": ["library.borrow", "library.manage"] },
        "descriptions": { "library.borrow": "Borrow library books" }
    }))?;

    let config = AuthzConfig {
        policy_path: Some(path),
        ..AuthzConfig::default()
    };
    let policy = std::sync::Arc::new(config.load_policy()?);
    assert_eq!(policy.describe("library.borrow"), "Borrow library books");
    assert_eq!(policy.describe("library.manage"), campus_authz::authz::UNDESCRIBED);
    assert_eq!(policy.undocumented(), ["library.manage"]);

    let session = AuthorizationSession::new(policy);
    session.activate(Role::PARENT);
    assert!(session.can_access("library"));
    assert!(!session.has("library.manage"));
    assert!(!session.has(permissions::ACADEMIC_VIEW_GRADES));

    session.activate(Role::EDUCATOR);
    assert!(session.capabilities().is_empty());

    session.activate(Role::ADMIN);
    assert!(session.has_all(["library.borrow", "library.manage", "system.manage_settings"]));
    Ok(())
}

#[test]
fn dangling_feature_reference_aborts_loading() -> Result<()> {
    let (_dir, path) = write_policy(json!({
        "catalog": ["library.borrow"],
        "roles": { "6": "*" },
        "features": { "library": ["library.burn"] }
    }))?;

    match Policy::load(&path) {
        Err(AuthzError::UnknownCapability { capability, referenced_by }) => {
            assert_eq!(capability, "library.burn");
            assert!(referenced_by.contains("library"));
        }
        other => panic!("expected UnknownCapability, got {other:?}"),
    }
    Ok(())
}

#[test]
fn malformed_catalog_entry_aborts_loading() -> Result<()> {
    let (_dir, path) = write_policy(json!({
        "catalog": ["library"],
        "roles": {}
    }))?;
    assert!(matches!(Policy::load(&path), Err(AuthzError::MalformedCapability(c)) if c == "library"));
    Ok(())
}

#[test]
fn admin_must_hold_the_catalog() -> Result<()> {
    let (_dir, path) = write_policy(json!({
        "roles": { "6": [permissions::SYSTEM_MANAGE_SETTINGS] }
    }))?;
    assert!(matches!(Policy::load(&path), Err(AuthzError::IncompleteAdministrator { .. })));
    Ok(())
}

#[test]
fn parse_errors_name_the_offending_path() {
    let err = Policy::from_json(r#"{"roles": {"1": 5}}"#).unwrap_err();
    assert_eq!(err.kind(), "parse");
    assert!(err.to_string().contains("roles"), "{err}");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Policy::load("/definitely/not/here/policy.json").unwrap_err();
    assert!(matches!(err, AuthzError::Io { .. }));
}

#[test]
fn dumped_builtin_policy_reloads_identically() -> Result<()> {
    let builtin = Policy::builtin();
    let (_dir, path) = write_policy(serde_json::to_value(builtin.to_document())?)?;
    let reloaded = Policy::load(&path)?;
    assert_eq!(reloaded.fingerprint(), builtin.fingerprint());
    Ok(())
}
