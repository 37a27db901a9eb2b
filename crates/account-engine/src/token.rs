//! Access tokens and per-account metadata.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response keys consumed by the token grant itself; everything else the
/// server sends back is kept as profile data.
const GRANT_KEYS: [&str; 3] = ["access_token", "expires_in", "token_type"];

/// An OAuth-style access token for one account server.
///
/// The serde field names form the persisted record, together with
/// [`AccountInfo`]'s `profileFields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// The bearer token string. Empty means "no token".
    pub token: String,

    /// Token type reported by the server (e.g. "Bearer").
    #[serde(rename = "tokenType")]
    pub token_type: String,

    /// Instant the token stops being usable.
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Build a token granted now that lasts `expires_in` seconds.
    pub fn from_grant(
        token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: i64,
    ) -> Self {
        Self {
            token: token.into(),
            token_type: token_type.into(),
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }

    /// Whether the expiry instant has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// A token is valid iff it is non-empty and unexpired.
    pub fn is_valid(&self) -> bool {
        !self.token.is_empty() && !self.is_expired()
    }
}

impl Default for AccessToken {
    /// The empty token: expired at the epoch, never valid.
    fn default() -> Self {
        Self {
            token: String::new(),
            token_type: String::new(),
            expires_at: DateTime::UNIX_EPOCH,
        }
    }
}

/// Everything the client stores about one account server: the current
/// access token plus whatever profile fields the grant response carried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(flatten)]
    pub access_token: AccessToken,

    /// Grant-response fields beyond the token itself.
    #[serde(rename = "profileFields", default)]
    pub profile: Map<String, Value>,
}

impl AccountInfo {
    /// Build account info from a successful password-grant response
    /// object.
    ///
    /// Returns `None` when any required grant field (`access_token`,
    /// `expires_in`, `token_type`) is missing or has the wrong shape.
    pub fn from_grant_response(object: &Map<String, Value>) -> Option<Self> {
        let token = object.get("access_token")?.as_str()?;
        let expires_in = object.get("expires_in")?.as_i64()?;
        let token_type = object.get("token_type")?.as_str()?;

        let profile = object
            .iter()
            .filter(|(key, _)| !GRANT_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Self {
            access_token: AccessToken::from_grant(token, token_type, expires_in),
            profile,
        })
    }

    /// The `username` profile field, when the server sent one.
    pub fn username(&self) -> Option<&str> {
        self.profile.get("username").and_then(Value::as_str)
    }

    /// Whether the stored token is usable right now.
    pub fn is_valid(&self) -> bool {
        self.access_token.is_valid()
    }
}
