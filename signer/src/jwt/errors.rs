use thiserror::Error;

/// Errors that can occur during access token operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Token signing failed: {0}")]
    SigningFailed(String),

    #[error("Token has expired")]
    Expired,

    #[error("Token claim rejected: {0}")]
    ClaimMismatch(&'static str),

    #[error("Token is invalid: {0}")]
    Invalid(String),
}
