use thiserror::Error;

use crate::domain::contact::errors::ContactError;

/// Errors for refresh token store operations
#[derive(Debug, Clone, Error)]
pub enum RefreshTokenError {
    #[error("Refresh token not found")]
    NotFound,

    #[error("Refresh token has expired")]
    Expired,

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors for access token minting
#[derive(Debug, Error)]
pub enum AccessTokenError {
    #[error("Failed to sign access token: {0}")]
    Signing(#[from] signer::JwtError),

    #[error("Failed to read linked contacts: {0}")]
    Contacts(#[from] ContactError),
}
