use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::DispatchError;
use crate::domain::auth::models::RefreshGrant;
use crate::domain::contact::models::Contact;
use crate::domain::nonce::models::NonceIntent;
use crate::domain::nonce::models::NonceSecret;
use crate::domain::token::models::RefreshSecret;
use crate::domain::user::models::Account;
use crate::domain::user::models::Profile;
use crate::domain::user::models::UserId;

/// Port for authentication and account flows.
///
/// Caller identity is always an explicit argument, taken from a verified
/// access token by the transport layer. Nothing here reads ambient state.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Issue a nonce for a contact and hand it to the dispatcher.
    ///
    /// The intent is decided here: a linked contact gets a sign-in nonce, an
    /// unknown one a registration nonce, or a contact-adding nonce when the
    /// client says so. The returned intent is for logging only; transports
    /// must not reveal it, or the endpoint becomes an account-existence
    /// oracle.
    ///
    /// # Arguments
    /// * `contact` - Validated contact to deliver the nonce to
    /// * `is_adding_contact` - Client intends to attach the contact to an
    ///   existing account
    ///
    /// # Returns
    /// The intent recorded with the nonce
    ///
    /// # Errors
    /// * `Internal` - Storage, generation, or delivery failed
    async fn send_nonce(
        &self,
        contact: Contact,
        is_adding_contact: bool,
    ) -> Result<NonceIntent, AuthError>;

    /// Consume a nonce and produce a refresh grant.
    ///
    /// What happens depends on the intent recorded at issue time:
    /// registration (requires `profile`), sign-in of the contact's owner, or
    /// linking the contact to `caller`. Every path ends with a fresh refresh
    /// token.
    ///
    /// # Arguments
    /// * `secret` - Nonce secret presented by the client
    /// * `profile` - Registration profile, required for new-user nonces
    /// * `caller` - Authenticated caller, required for contact-adding nonces
    ///
    /// # Returns
    /// Grant with the resolved user and a refresh token
    ///
    /// # Errors
    /// * `NotFound` - Unknown secret, or the contact's owner is gone
    /// * `Expired` - The nonce existed but its lifetime had passed
    /// * `Validation` - Required profile or caller is missing
    /// * `Conflict` - The contact was claimed by someone else in the meantime
    /// * `Internal` - Storage operation failed or timed out
    async fn exchange_nonce(
        &self,
        secret: NonceSecret,
        profile: Option<Profile>,
        caller: Option<UserId>,
    ) -> Result<RefreshGrant, AuthError>;

    /// Exchange a refresh token for a signed access token.
    ///
    /// The contact claim is read fresh from the directory, so contacts
    /// linked or removed since the last mint are reflected.
    ///
    /// # Arguments
    /// * `secret` - Refresh token secret presented by the client
    ///
    /// # Returns
    /// Signed access token string
    ///
    /// # Errors
    /// * `NotFound` - Unknown secret
    /// * `Expired` - The token existed but its lifetime had passed
    /// * `Internal` - Storage or signing failed
    async fn exchange_refresh_token(&self, secret: RefreshSecret) -> Result<String, AuthError>;

    /// Revoke every refresh token of the calling user.
    ///
    /// Outstanding access tokens stay valid until they expire; only their
    /// renewal is cut off.
    ///
    /// # Arguments
    /// * `caller` - Authenticated caller
    ///
    /// # Errors
    /// * `Internal` - Storage operation failed
    async fn revoke(&self, caller: UserId) -> Result<(), AuthError>;

    /// Unlink a contact from the calling user.
    ///
    /// # Arguments
    /// * `caller` - Authenticated caller
    /// * `contact` - Contact to unlink
    ///
    /// # Errors
    /// * `Conflict` - Contact is not the caller's, or is their only one
    /// * `Internal` - Storage operation failed
    async fn remove_contact(&self, caller: UserId, contact: Contact) -> Result<(), AuthError>;

    /// Fetch the calling user together with their linked contacts.
    ///
    /// # Arguments
    /// * `caller` - Authenticated caller
    ///
    /// # Returns
    /// Account read model
    ///
    /// # Errors
    /// * `NotFound` - The account no longer exists
    /// * `Internal` - Storage operation failed
    async fn get_account(&self, caller: UserId) -> Result<Account, AuthError>;

    /// Replace the calling user's profile.
    ///
    /// # Arguments
    /// * `caller` - Authenticated caller
    /// * `profile` - New profile
    ///
    /// # Errors
    /// * `NotFound` - The account no longer exists
    /// * `Internal` - Storage operation failed
    async fn update_profile(&self, caller: UserId, profile: Profile) -> Result<(), AuthError>;

    /// Delete the calling user's account.
    ///
    /// Linked contacts and refresh tokens go with it; outstanding access
    /// tokens expire on their own.
    ///
    /// # Arguments
    /// * `caller` - Authenticated caller
    ///
    /// # Errors
    /// * `NotFound` - The account no longer exists
    /// * `Internal` - Storage operation failed
    async fn delete_account(&self, caller: UserId) -> Result<(), AuthError>;
}

/// Delivery port for issued nonces.
///
/// The service never returns nonce secrets to the requesting client; they
/// travel out of band through an implementation of this port.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync + 'static {
    /// Deliver a nonce secret to a contact.
    ///
    /// # Arguments
    /// * `contact` - Destination address
    /// * `secret` - Nonce secret to deliver
    /// * `intent` - What the nonce will do, for message wording
    ///
    /// # Errors
    /// * `DeliveryFailed` - The transport rejected the message
    async fn send(
        &self,
        contact: &Contact,
        secret: &NonceSecret,
        intent: NonceIntent,
    ) -> Result<(), DispatchError>;
}
