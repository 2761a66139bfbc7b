use async_trait::async_trait;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::Profile;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Persistence port for the user aggregate.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Persist a new user with a fresh identifier.
    ///
    /// # Arguments
    /// * `profile` - Validated registration profile
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `Storage` - Storage operation failed
    async fn create(&self, profile: Profile) -> Result<User, UserError>;

    /// Retrieve a user by identifier.
    ///
    /// # Arguments
    /// * `id` - User ID
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Storage` - Storage operation failed
    async fn find(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Replace a user's profile.
    ///
    /// # Arguments
    /// * `id` - User ID to update
    /// * `profile` - New profile
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Storage` - Storage operation failed
    async fn update(&self, id: &UserId, profile: Profile) -> Result<(), UserError>;

    /// Remove a user and everything hanging off them.
    ///
    /// Linked contacts and refresh tokens are removed in the same operation;
    /// no dangling link may survive the user.
    ///
    /// # Arguments
    /// * `id` - User ID to delete
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Storage` - Storage operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
