use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::contact::models::Contact;
use crate::domain::nonce::errors::ParseNonceIntentError;

/// Opaque secret of a single-use verification nonce.
///
/// Any string a client presents is a candidate secret; validity is decided by
/// the store, not by parsing. Deliberately has no Display so it cannot leak
/// through log formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonceSecret(String);

impl NonceSecret {
    /// Get the secret as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the secret, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for NonceSecret {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

/// What consuming a nonce will do, decided when the nonce is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceIntent {
    /// Contact is unknown; consuming registers a new user
    NewUser,
    /// Contact is linked; consuming signs its owner in
    ReturningUser,
    /// Contact is unknown and the requester holds a session; consuming links
    /// the contact to the authenticated caller
    AddingContact,
}

impl NonceIntent {
    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NonceIntent::NewUser => "new_user",
            NonceIntent::ReturningUser => "returning_user",
            NonceIntent::AddingContact => "adding_contact",
        }
    }
}

impl fmt::Display for NonceIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NonceIntent {
    type Err = ParseNonceIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_user" => Ok(NonceIntent::NewUser),
            "returning_user" => Ok(NonceIntent::ReturningUser),
            "adding_contact" => Ok(NonceIntent::AddingContact),
            other => Err(ParseNonceIntentError(other.to_string())),
        }
    }
}

/// A stored verification nonce.
///
/// At most one lives per contact; issuing a new one replaces it.
#[derive(Debug, Clone)]
pub struct Nonce {
    pub contact: Contact,
    pub secret: NonceSecret,
    pub intent: NonceIntent,
    pub expires_at: DateTime<Utc>,
}

/// What a successfully consumed nonce proves: control of a contact, and the
/// intent recorded at issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedNonce {
    pub contact: Contact,
    pub intent: NonceIntent,
}

/// Issuing policy for nonces.
#[derive(Debug, Clone)]
pub struct NoncePolicy {
    pub secret_length: usize,
    pub ttl: Duration,
}
