//! Search filter tests driven from loaded configuration

mod common;

use common::principals;
use repo_access::{AccessConfig, AccessError, AccessFilterBuilder, GlobalPermissionEvaluator};

const CONFIG: &str = r#"
[global]
principals = ["repo:admins"]

[filter]
patron_access_enabled = true
"#;

fn scoped_filter(config: &AccessConfig, names: &[&str]) -> Result<String, AccessError> {
    let global = GlobalPermissionEvaluator::from_config(&config.global);
    let builder = AccessFilterBuilder::from_config(&config.filter);
    let caller = principals(names);

    let filter = builder.build_filter(
        &caller,
        config.filter.patron_access_enabled,
        global.has_global_principal(&caller),
    )?;
    Ok(filter.to_string())
}

#[test]
fn test_patron_and_admin_groups() {
    let config = AccessConfig::from_toml_str(CONFIG).unwrap();
    assert_eq!(
        scoped_filter(&config, &["g1", "g2"]).unwrap(),
        "readGroup:(g1 OR g2) OR adminGroup:(g1 OR g2)"
    );
}

#[test]
fn test_admin_only_mode() {
    let mut config = AccessConfig::from_toml_str(CONFIG).unwrap();
    config.filter.patron_access_enabled = false;
    assert_eq!(scoped_filter(&config, &["g1", "g2"]).unwrap(), "adminGroup:(g1 OR g2)");
}

#[test]
fn test_global_caller_is_unrestricted() {
    let config = AccessConfig::from_toml_str(CONFIG).unwrap();
    assert_eq!(scoped_filter(&config, &["repo:admins", "g1"]).unwrap(), "");
}

#[test]
fn test_empty_caller_rejected() {
    let config = AccessConfig::from_toml_str(CONFIG).unwrap();
    let err = scoped_filter(&config, &[]).unwrap_err();
    assert!(matches!(err, AccessError::InvalidInput(_)));
}

#[test]
fn test_blank_caller_rejected() {
    let config = AccessConfig::from_toml_str(CONFIG).unwrap();
    let err = scoped_filter(&config, &["g1", ""]).unwrap_err();
    assert!(matches!(err, AccessError::InvalidInput(_)));
}

#[test]
fn test_public_groups_are_literal_terms() {
    let config = AccessConfig::default();
    assert_eq!(
        scoped_filter(&config, &["everyone", "authenticated"]).unwrap(),
        "readGroup:(authenticated OR everyone) OR adminGroup:(authenticated OR everyone)"
    );
}
