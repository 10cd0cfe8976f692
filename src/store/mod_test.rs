use super::*;

#[test]
fn default_credentials_are_empty() {
    let creds = StoredCredentials::default();
    assert!(creds.has_no_tokens());
    assert!(creds.is_empty());
}

#[test]
fn refresh_token_alone_is_not_empty() {
    let creds = StoredCredentials { refresh_token: Some("r1".into()), ..StoredCredentials::default() };
    assert!(!creds.has_no_tokens());
}

#[test]
fn absent_fields_are_not_serialized() {
    let creds = StoredCredentials { access_token: Some("a1".into()), ..StoredCredentials::default() };
    let json = serde_json::to_value(&creds).unwrap();
    assert_eq!(json, serde_json::json!({ "accessToken": "a1" }));
}

#[test]
fn debug_output_redacts_tokens() {
    let creds = StoredCredentials {
        access_token: Some("secret-a".into()),
        refresh_token: Some("secret-r".into()),
        user: None,
    };
    let rendered = format!("{creds:?}");
    assert!(!rendered.contains("secret-a"));
    assert!(!rendered.contains("secret-r"));
}
