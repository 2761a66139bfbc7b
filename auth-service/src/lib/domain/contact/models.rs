use std::fmt;
use std::str::FromStr;

use crate::domain::contact::errors::ContactError;

/// Contact address value type
///
/// A reachable address a nonce can be delivered to. Validated as an RFC 5322
/// email address and normalized (trimmed, lowercased) so that equality is
/// canonical: `Alice@Example.com` and `alice@example.com` are the same contact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Contact(String);

impl Contact {
    /// Create a new validated, normalized contact.
    ///
    /// # Arguments
    /// * `raw` - Raw contact string as supplied by a client
    ///
    /// # Returns
    /// Validated Contact value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Address does not conform to RFC 5322
    pub fn new(raw: String) -> Result<Self, ContactError> {
        let normalized = raw.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| Contact(normalized))
            .map_err(|e| ContactError::InvalidFormat(e.to_string()))
    }

    /// Get the contact as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let contact = Contact::new("  Alice@Example.COM ".to_string()).unwrap();
        assert_eq!(contact.as_str(), "alice@example.com");
        assert_eq!(contact, Contact::new("alice@example.com".to_string()).unwrap());
    }

    #[test]
    fn test_rejects_invalid_address() {
        assert!(matches!(
            Contact::new("not-an-address".to_string()),
            Err(ContactError::InvalidFormat(_))
        ));
        assert!(matches!(
            Contact::new("".to_string()),
            Err(ContactError::InvalidFormat(_))
        ));
    }
}
