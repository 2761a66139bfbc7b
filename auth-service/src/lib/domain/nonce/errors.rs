use thiserror::Error;

/// Error for NonceIntent parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown nonce intent: {0}")]
pub struct ParseNonceIntentError(pub String);

/// Errors for nonce store operations
#[derive(Debug, Clone, Error)]
pub enum NonceError {
    #[error("Nonce not found")]
    NotFound,

    #[error("Nonce has expired")]
    Expired,

    #[error("Storage error: {0}")]
    Storage(String),
}
