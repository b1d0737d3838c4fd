use pretty_assertions::assert_eq;

use super::{validate_auth_source, validate_db_name, Credential};

#[test]
fn empty_credential_is_valid() {
    let credential = Credential::anonymous();
    assert!(credential.is_empty());
    assert!(credential.validate().is_ok());
}

#[test]
fn missing_username_is_rejected() {
    let credential = Credential::builder()
        .password("admin".to_string())
        .build();
    let error = credential.validate().unwrap_err();
    assert!(error.to_string().contains("no username"));

    let credential = Credential::new("", "admin");
    assert!(credential.validate().is_err());
}

#[test]
fn missing_password_is_rejected() {
    let credential = Credential::builder()
        .username("admin".to_string())
        .build();
    assert!(credential.validate().is_err());
}

#[test]
fn invalid_source_is_rejected() {
    let credential = Credential::builder()
        .username("admin".to_string())
        .password("admin".to_string())
        .source("ad.min".to_string())
        .build();
    assert!(credential.validate().is_err());
}

#[test]
fn source_resolution_order() {
    let plain = Credential::new("admin", "admin");
    assert_eq!(plain.resolved_source("dbAuthTests", None), "dbAuthTests");
    assert_eq!(plain.resolved_source("dbAuthTests", Some("admin")), "admin");

    let with_source = Credential::builder()
        .username("admin".to_string())
        .password("admin".to_string())
        .source("users".to_string())
        .build();
    assert_eq!(with_source.resolved_source("dbAuthTests", None), "users");
    assert_eq!(
        with_source.resolved_source("dbAuthTests", Some("admin")),
        "admin"
    );
}

#[test]
fn debug_omits_password() {
    let credential = Credential::new("admin", "hunter2");
    let debug = format!("{:?}", credential);
    assert!(debug.contains("admin"));
    assert!(!debug.contains("hunter2"));
}

#[test]
fn deserializes_from_config() {
    let credential: Credential = serde_json::from_str(
        r#"{ "username": "admin", "password": "admin", "source": "admin" }"#,
    )
    .unwrap();
    let mut expected = Credential::new("admin", "admin");
    expected.source = Some("admin".to_string());
    assert_eq!(credential, expected);
}

#[test]
fn db_names() {
    assert!(validate_db_name("dbAuthTests").is_ok());
    assert!(validate_db_name("").is_err());
    assert!(validate_db_name("a.b").is_err());
    assert!(validate_db_name("a b").is_err());
    assert!(validate_db_name("$external").is_err());
    assert!(validate_auth_source("$external").is_ok());
    assert!(validate_auth_source("admin").is_ok());
}
