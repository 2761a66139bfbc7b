//! Token utilities library
//!
//! Provides reusable token infrastructure for passwordless services:
//! - Cryptographically random secret generation (nonces, refresh tokens)
//! - Signed access token creation and verification (JWT)
//!
//! Each service defines its own token stores and flows and adapts these
//! implementations. This avoids coupling services through shared domain logic
//! while reducing code duplication.
//!
//! # Examples
//!
//! ## Secret generation
//! ```
//! use signer::SecretGenerator;
//!
//! let generator = SecretGenerator::new(32);
//! let secret = generator.generate().unwrap();
//! assert_eq!(secret.len(), 32);
//! ```
//!
//! ## Access tokens
//! ```
//! use signer::{AccessClaims, TokenSigner};
//!
//! let signer = TokenSigner::hs256(b"secret_key_at_least_32_bytes_long!")
//!     .with_issuer("issuer")
//!     .with_audience("audience");
//!
//! let claims = AccessClaims::for_user("user123", vec!["user@example.com".to_string()], 300);
//! let token = signer.sign(&claims).unwrap();
//!
//! let decoded = signer.verify(&token).unwrap();
//! assert_eq!(decoded.sub, "user123");
//! ```

pub mod jwt;
pub mod secret;

// Re-export commonly used items
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::TokenSigner;
pub use secret::SecretError;
pub use secret::SecretGenerator;
