use std::collections::HashMap;
use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::contact::models::Contact;
use crate::domain::user::errors::DisplayNameError;
use crate::domain::user::errors::UserIdError;

/// User aggregate entity.
///
/// A registered account. Carries no credentials; authentication happens
/// through nonces and tokens, and reachability through linked contacts.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Arguments
    /// * `s` - UUID string to parse
    ///
    /// # Returns
    /// Parsed UserId
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Ensures the name is 3-15 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 15;

    /// Create a new valid display name.
    ///
    /// # Arguments
    /// * `name` - Raw display name string
    ///
    /// # Returns
    /// Validated DisplayName value object
    ///
    /// # Errors
    /// * `TooShort` - Name shorter than 3 characters
    /// * `TooLong` - Name longer than 15 characters
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let length = name.chars().count();
        if length < Self::MIN_LENGTH {
            Err(DisplayNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    /// Get the display name as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Profile supplied at registration and editable afterwards.
///
/// Besides the mandatory display name, clients may attach arbitrary
/// attributes (favourite colour and the like). Attributes are stored and
/// echoed back verbatim; the service never interprets them.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub display_name: DisplayName,
    pub attributes: HashMap<String, serde_json::Value>,
}

impl Profile {
    /// Create a profile with an empty attribute set.
    pub fn new(display_name: DisplayName) -> Self {
        Self {
            display_name,
            attributes: HashMap::new(),
        }
    }

    /// Add a custom attribute.
    pub fn with_attribute(mut self, key: impl ToString, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }
}

/// A user together with the contacts currently linked to them.
///
/// Read model assembled for account lookups; never persisted as one piece.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub contacts: Vec<Contact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_bounds() {
        assert!(DisplayName::new("Bob".to_string()).is_ok());
        assert!(DisplayName::new("a".repeat(15)).is_ok());

        assert!(matches!(
            DisplayName::new("ab".to_string()),
            Err(DisplayNameError::TooShort { min: 3, actual: 2 })
        ));
        assert!(matches!(
            DisplayName::new("a".repeat(16)),
            Err(DisplayNameError::TooLong { max: 15, actual: 16 })
        ));
    }

    #[test]
    fn test_user_id_round_trips_through_string() {
        let id = UserId::new();
        let parsed = UserId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_user_id_rejects_garbage() {
        assert!(UserId::from_string("not-a-uuid").is_err());
    }
}
