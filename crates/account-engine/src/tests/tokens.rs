//! Access token validity and grant-response parsing.

use crate::{AccessToken, AccountInfo};
use chrono::{Duration, Utc};
use serde_json::json;

#[test]
fn token_with_future_expiry_is_valid() {
    let token = AccessToken {
        token: "abc123".to_string(),
        token_type: "Bearer".to_string(),
        expires_at: Utc::now() + Duration::hours(1),
    };
    assert!(token.is_valid());
    assert!(!token.is_expired());
}

#[test]
fn empty_token_is_invalid_even_with_future_expiry() {
    let token = AccessToken {
        token: String::new(),
        token_type: "Bearer".to_string(),
        expires_at: Utc::now() + Duration::hours(1),
    };
    assert!(!token.is_valid());
}

#[test]
fn expired_token_is_invalid() {
    let token = AccessToken {
        token: "abc123".to_string(),
        token_type: "Bearer".to_string(),
        expires_at: Utc::now() - Duration::seconds(1),
    };
    assert!(token.is_expired());
    assert!(!token.is_valid());
}

#[test]
fn default_token_is_invalid() {
    let token = AccessToken::default();
    assert!(token.token.is_empty());
    assert!(token.is_expired());
    assert!(!token.is_valid());
}

#[test]
fn from_grant_derives_expiry_from_now() {
    let before = Utc::now();
    let token = AccessToken::from_grant("abc123", "Bearer", 3600);
    let after = Utc::now();

    assert!(token.expires_at >= before + Duration::seconds(3600));
    assert!(token.expires_at <= after + Duration::seconds(3600));
    assert!(token.is_valid());
}

#[test]
fn token_serde_uses_wire_field_names() {
    let token = AccessToken::from_grant("abc123", "Bearer", 3600);
    let value = serde_json::to_value(&token).unwrap();
    let object = value.as_object().unwrap();

    assert!(object.contains_key("token"));
    assert!(object.contains_key("tokenType"));
    assert!(object.contains_key("expiresAt"));
    assert_eq!(object["token"], "abc123");
}

#[test]
fn account_info_record_is_flat_with_profile_fields() {
    let mut info = AccountInfo {
        access_token: AccessToken::from_grant("abc123", "Bearer", 3600),
        profile: serde_json::Map::new(),
    };
    info.profile
        .insert("username".to_string(), json!("alice"));

    let value = serde_json::to_value(&info).unwrap();
    let object = value.as_object().unwrap();

    assert!(object.contains_key("token"));
    assert!(object.contains_key("tokenType"));
    assert!(object.contains_key("expiresAt"));
    assert_eq!(object["profileFields"]["username"], "alice");
}

#[test]
fn account_info_serde_roundtrip() {
    let mut info = AccountInfo {
        access_token: AccessToken::from_grant("abc123", "Bearer", 3600),
        profile: serde_json::Map::new(),
    };
    info.profile.insert("username".to_string(), json!("alice"));

    let serialized = serde_json::to_string(&info).unwrap();
    let restored: AccountInfo = serde_json::from_str(&serialized).unwrap();

    assert_eq!(restored, info);
}

#[test]
fn grant_response_with_all_fields_parses() {
    let response = json!({
        "access_token": "abc123",
        "expires_in": 3600,
        "token_type": "Bearer",
        "username": "alice",
    });

    let info = AccountInfo::from_grant_response(response.as_object().unwrap()).unwrap();

    assert_eq!(info.access_token.token, "abc123");
    assert_eq!(info.access_token.token_type, "Bearer");
    assert!(info.is_valid());
    assert_eq!(info.username(), Some("alice"));
    // grant fields are not profile data
    assert!(!info.profile.contains_key("access_token"));
    assert!(!info.profile.contains_key("expires_in"));
    assert!(!info.profile.contains_key("token_type"));
}

#[test]
fn grant_response_missing_any_required_field_is_rejected() {
    let full = json!({
        "access_token": "abc123",
        "expires_in": 3600,
        "token_type": "Bearer",
    });

    for missing in ["access_token", "expires_in", "token_type"] {
        let mut object = full.as_object().unwrap().clone();
        object.remove(missing);
        assert!(
            AccountInfo::from_grant_response(&object).is_none(),
            "expected rejection without {missing}"
        );
    }
}

#[test]
fn grant_response_with_wrong_field_shapes_is_rejected() {
    let response = json!({
        "access_token": "abc123",
        "expires_in": "3600",
        "token_type": "Bearer",
    });
    assert!(AccountInfo::from_grant_response(response.as_object().unwrap()).is_none());

    let response = json!({
        "access_token": 42,
        "expires_in": 3600,
        "token_type": "Bearer",
    });
    assert!(AccountInfo::from_grant_response(response.as_object().unwrap()).is_none());
}

#[test]
fn username_absent_when_not_in_profile() {
    let response = json!({
        "access_token": "abc123",
        "expires_in": 3600,
        "token_type": "Bearer",
    });

    let info = AccountInfo::from_grant_response(response.as_object().unwrap()).unwrap();
    assert_eq!(info.username(), None);
}
