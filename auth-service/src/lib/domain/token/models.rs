use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;

use crate::domain::user::models::UserId;

/// Opaque secret of a long-lived refresh token.
///
/// Like nonce secrets these are compared verbatim and carry no Display, so
/// they cannot leak through log formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefreshSecret(String);

impl RefreshSecret {
    /// Get the secret as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the secret, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for RefreshSecret {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

/// A stored refresh token.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub secret: RefreshSecret,
    pub owner: UserId,
    pub expires_at: DateTime<Utc>,
}

/// How many refresh tokens a user may hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Issuing a token revokes the user's previous ones; signing in on a new
    /// device signs every other device out
    SingleActive,
    /// Tokens accumulate until revoked or expired; each device keeps its own
    MultiDevice,
}

/// Issuing policy for refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenPolicy {
    pub secret_length: usize,
    pub ttl: Duration,
    pub rotation: RotationPolicy,
}
