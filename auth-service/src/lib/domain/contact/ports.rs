use async_trait::async_trait;

use crate::domain::contact::errors::ContactError;
use crate::domain::contact::models::Contact;
use crate::domain::user::models::UserId;

/// Persistence port for contact-to-user links.
///
/// A contact is linked to at most one user at a time. Implementations must
/// enforce that invariant atomically; callers never check-then-link.
#[async_trait]
pub trait ContactDirectory: Send + Sync + 'static {
    /// Check whether a contact is linked to any user.
    ///
    /// # Arguments
    /// * `contact` - Contact to look up
    ///
    /// # Returns
    /// True when the contact is linked
    ///
    /// # Errors
    /// * `Storage` - Storage operation failed
    async fn exists(&self, contact: &Contact) -> Result<bool, ContactError>;

    /// Find the user a contact is linked to.
    ///
    /// # Arguments
    /// * `contact` - Contact to look up
    ///
    /// # Returns
    /// Owning user ID, or None when the contact is unlinked
    ///
    /// # Errors
    /// * `Storage` - Storage operation failed
    async fn find_owner(&self, contact: &Contact) -> Result<Option<UserId>, ContactError>;

    /// Link a contact to a user, atomically failing if it is already taken.
    ///
    /// Linking a contact to the user it is already linked to succeeds without
    /// any effect.
    ///
    /// # Arguments
    /// * `user_id` - User the contact should belong to
    /// * `contact` - Contact to link
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `AlreadyLinked` - Contact belongs to a different user
    /// * `OwnerNotFound` - The user does not exist
    /// * `Storage` - Storage operation failed
    async fn link(&self, user_id: &UserId, contact: &Contact) -> Result<(), ContactError>;

    /// Remove the link between a contact and a user.
    ///
    /// Refuses to remove a user's only contact; a user must always stay
    /// reachable.
    ///
    /// # Arguments
    /// * `contact` - Contact to unlink
    /// * `user_id` - User the contact is expected to belong to
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `LinkNotFound` - Contact is not linked to this user
    /// * `LastContact` - Contact is the user's only one
    /// * `Storage` - Storage operation failed
    async fn unlink(&self, contact: &Contact, user_id: &UserId) -> Result<(), ContactError>;

    /// List all contacts linked to a user, in canonical order.
    ///
    /// # Arguments
    /// * `user_id` - User to list contacts for
    ///
    /// # Returns
    /// Sorted vector of linked contacts (empty if none)
    ///
    /// # Errors
    /// * `Storage` - Storage operation failed
    async fn linked(&self, user_id: &UserId) -> Result<Vec<Contact>, ContactError>;
}
