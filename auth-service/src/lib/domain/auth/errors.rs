use thiserror::Error;

use crate::domain::contact::errors::ContactError;
use crate::domain::nonce::errors::NonceError;
use crate::domain::token::errors::AccessTokenError;
use crate::domain::token::errors::RefreshTokenError;
use crate::domain::user::errors::UserError;

/// Error for nonce delivery failures
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("Failed to deliver nonce: {0}")]
    DeliveryFailed(String),
}

/// Top-level error for authentication flows.
///
/// Storage details and timeouts are folded into `Internal`, whose Display is
/// deliberately opaque; the cause is kept for logs and reachable through
/// Debug.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Credential not found")]
    NotFound,

    #[error("Credential has expired")]
    Expired,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error")]
    Internal(String),
}

impl From<NonceError> for AuthError {
    fn from(err: NonceError) -> Self {
        match err {
            NonceError::NotFound => AuthError::NotFound,
            NonceError::Expired => AuthError::Expired,
            NonceError::Storage(cause) => AuthError::Internal(cause),
        }
    }
}

impl From<RefreshTokenError> for AuthError {
    fn from(err: RefreshTokenError) -> Self {
        match err {
            RefreshTokenError::NotFound => AuthError::NotFound,
            RefreshTokenError::Expired => AuthError::Expired,
            RefreshTokenError::Storage(cause) => AuthError::Internal(cause),
        }
    }
}

impl From<ContactError> for AuthError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::InvalidFormat(_) => AuthError::Validation(err.to_string()),
            ContactError::AlreadyLinked(_)
            | ContactError::LinkNotFound(_)
            | ContactError::LastContact => AuthError::Conflict(err.to_string()),
            ContactError::OwnerNotFound => AuthError::NotFound,
            ContactError::Storage(cause) => AuthError::Internal(cause),
        }
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AuthError::NotFound,
            UserError::InvalidProfile(_) => AuthError::Validation(err.to_string()),
            UserError::Storage(cause) => AuthError::Internal(cause),
        }
    }
}

impl From<AccessTokenError> for AuthError {
    fn from(err: AccessTokenError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<DispatchError> for AuthError {
    fn from(err: DispatchError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
