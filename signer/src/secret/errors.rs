use thiserror::Error;

/// Errors that can occur during secret generation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("Secret length too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Random source failed: {0}")]
    RandomSource(String),
}
