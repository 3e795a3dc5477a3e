use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Reported lifetimes beyond this are clamped.
const MAX_LIFETIME_SECS: u64 = 365 * 24 * 60 * 60;

/// A bearer token together with the instant after which it must not be used.
///
/// Tokens are replaced wholesale on refresh, never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Builds a cached token from an exchange result, pulling the expiry
    /// forward by `safety_margin`.
    pub fn from_issued(issued: IssuedToken, now: DateTime<Utc>, safety_margin: Duration) -> Self {
        let lifetime = Duration::seconds(issued.expires_in.min(MAX_LIFETIME_SECS) as i64);
        Token {
            value: issued.access_token,
            expires_at: now + lifetime - safety_margin,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// The body returned by an OAuth2 token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}
