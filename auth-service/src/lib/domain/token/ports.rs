use async_trait::async_trait;

use crate::domain::token::errors::RefreshTokenError;
use crate::domain::token::models::RefreshSecret;
use crate::domain::user::models::UserId;

/// Persistence port for long-lived refresh tokens.
///
/// Tokens are multi-use until they expire or their owner revokes them.
/// Individual tokens cannot be revoked; revocation always covers all of a
/// user's tokens at once.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Issue a fresh token for a user.
    ///
    /// Under the single-active rotation policy this also removes the user's
    /// previous tokens, atomically with the insert.
    ///
    /// # Arguments
    /// * `user_id` - User the token belongs to
    ///
    /// # Returns
    /// The generated secret, for return to the client
    ///
    /// # Errors
    /// * `Storage` - Generation or storage failed
    async fn issue(&self, user_id: &UserId) -> Result<RefreshSecret, RefreshTokenError>;

    /// Resolve a presented secret to its owner.
    ///
    /// An expired token is purged on first presentation and reported as
    /// `Expired`; presenting the same secret again yields `NotFound`.
    ///
    /// # Arguments
    /// * `secret` - Secret presented by the client
    ///
    /// # Returns
    /// Owning user ID
    ///
    /// # Errors
    /// * `NotFound` - No token carries this secret
    /// * `Expired` - The token existed but its lifetime had passed
    /// * `Storage` - Storage operation failed
    async fn resolve_owner(&self, secret: &RefreshSecret) -> Result<UserId, RefreshTokenError>;

    /// Remove every token belonging to a user.
    ///
    /// Succeeds even when the user holds none.
    ///
    /// # Arguments
    /// * `user_id` - User whose tokens are revoked
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `Storage` - Storage operation failed
    async fn revoke_all(&self, user_id: &UserId) -> Result<(), RefreshTokenError>;
}
