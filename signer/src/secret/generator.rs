use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::SecretError;

/// Generates opaque random secrets of a fixed length.
///
/// Secrets are hex-encoded bytes from the operating system CSPRNG, so every
/// character carries four bits of entropy. They are meant to be compared for
/// exact equality and never parsed.
pub struct SecretGenerator {
    length: usize,
}

impl SecretGenerator {
    const MIN_LENGTH: usize = 8;

    /// Create a generator producing secrets of `length` characters.
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Generate a fresh random secret.
    ///
    /// # Returns
    /// Hex string of exactly the configured length
    ///
    /// # Errors
    /// * `TooShort` - Configured length is below the minimum
    /// * `RandomSource` - The operating system RNG failed
    pub fn generate(&self) -> Result<String, SecretError> {
        if self.length < Self::MIN_LENGTH {
            return Err(SecretError::TooShort {
                min: Self::MIN_LENGTH,
                actual: self.length,
            });
        }

        let mut bytes = vec![0u8; self.length.div_ceil(2)];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| SecretError::RandomSource(e.to_string()))?;

        let mut secret = hex::encode(bytes);
        secret.truncate(self.length);
        Ok(secret)
    }
}
