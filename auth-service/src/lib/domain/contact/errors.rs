use thiserror::Error;

use crate::domain::contact::models::Contact;

/// Errors for contact directory operations
#[derive(Debug, Clone, Error)]
pub enum ContactError {
    #[error("Invalid contact address: {0}")]
    InvalidFormat(String),

    #[error("Contact {0} is already linked to another user")]
    AlreadyLinked(Contact),

    #[error("Contact {0} is not linked to this user")]
    LinkNotFound(Contact),

    #[error("Cannot remove the only contact of a user")]
    LastContact,

    #[error("Owning user no longer exists")]
    OwnerNotFound,

    #[error("Storage error: {0}")]
    Storage(String),
}
