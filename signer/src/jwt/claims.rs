use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by a signed access token.
///
/// The payload is deliberately small: the subject, the contacts linked to the
/// subject at signing time, and the standard RFC 7519 timestamps. Issuer and
/// audience are stamped by [`TokenSigner::sign`](super::TokenSigner::sign)
/// when the signer is configured with them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Contact addresses linked to the subject when the token was signed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl AccessClaims {
    /// Create claims for a user with automatic timestamps.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier (becomes `sub`)
    /// * `contacts` - Contact addresses linked to the user right now
    /// * `ttl_secs` - Seconds until the token expires
    ///
    /// # Returns
    /// Claims with sub, contacts, iat, and exp set
    pub fn for_user(user_id: impl ToString, contacts: Vec<String>, ttl_secs: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::seconds(ttl_secs);

        Self {
            sub: user_id.to_string(),
            contacts,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            iss: None,
            aud: None,
        }
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Set audience.
    pub fn with_audience(mut self, aud: impl Into<String>) -> Self {
        self.aud = Some(aud.into());
        self
    }

    /// Check if the token is expired at the given timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
