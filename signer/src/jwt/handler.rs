use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::AccessClaims;
use super::errors::JwtError;

/// Signs and verifies access tokens.
///
/// Uses HS256 (HMAC with SHA-256). When configured with an issuer and an
/// audience, `sign` stamps them into every token and `verify` rejects tokens
/// that do not carry the same values, so a signer is always able to verify
/// its own output.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: Option<String>,
    audience: Option<String>,
}

impl TokenSigner {
    /// Create a new HS256 signer from a shared secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    /// - Rotate secrets periodically
    pub fn hs256(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: None,
            audience: None,
        }
    }

    /// Set the issuer stamped into signed tokens and required on verification.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the audience stamped into signed tokens and required on verification.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Sign claims into a token string.
    ///
    /// Claims that do not already carry an issuer or audience receive the
    /// signer's configured values.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn sign(&self, claims: &AccessClaims) -> Result<String, JwtError> {
        let mut claims = claims.clone();
        if claims.iss.is_none() {
            claims.iss = self.issuer.clone();
        }
        if claims.aud.is_none() {
            claims.aud = self.audience.clone();
        }

        let header = Header::new(self.algorithm);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }

    /// Verify a token string and return its claims.
    ///
    /// Checks the signature, the expiration time, and (when configured) the
    /// issuer and audience claims.
    ///
    /// # Errors
    /// * `Expired` - The token's `exp` is in the past
    /// * `ClaimMismatch` - Issuer or audience does not match
    /// * `Invalid` - The token is malformed or the signature does not match
    pub fn verify(&self, token: &str) -> Result<AccessClaims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(audience) = &self.audience {
            validation.set_audience(&[audience]);
        }

        let token_data =
            decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::Expired,
                    ErrorKind::InvalidIssuer => JwtError::ClaimMismatch("iss"),
                    ErrorKind::InvalidAudience => JwtError::ClaimMismatch("aud"),
                    _ => JwtError::Invalid(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}
