use async_trait::async_trait;

use crate::domain::contact::models::Contact;
use crate::domain::nonce::errors::NonceError;
use crate::domain::nonce::models::ConsumedNonce;
use crate::domain::nonce::models::NonceIntent;
use crate::domain::nonce::models::NonceSecret;

/// Persistence port for single-use verification nonces.
///
/// A contact holds at most one live nonce. Consumption is atomic: under
/// concurrent presentations of the same secret exactly one caller wins and
/// every other caller observes `NotFound`.
#[async_trait]
pub trait NonceStore: Send + Sync + 'static {
    /// Issue a fresh nonce for a contact, replacing any live one.
    ///
    /// # Arguments
    /// * `contact` - Contact the nonce will be delivered to
    /// * `intent` - What consuming the nonce will do
    ///
    /// # Returns
    /// The generated secret, for delivery to the contact
    ///
    /// # Errors
    /// * `Storage` - Generation or storage failed
    async fn issue(&self, contact: &Contact, intent: NonceIntent) -> Result<NonceSecret, NonceError>;

    /// Atomically take a nonce by secret, removing it from the store.
    ///
    /// An expired nonce is removed on first presentation and reported as
    /// `Expired`; presenting the same secret again yields `NotFound`.
    ///
    /// # Arguments
    /// * `secret` - Secret presented by the client
    ///
    /// # Returns
    /// The contact and intent recorded when the nonce was issued
    ///
    /// # Errors
    /// * `NotFound` - No nonce carries this secret
    /// * `Expired` - The nonce existed but its lifetime had passed
    /// * `Storage` - Storage operation failed
    async fn consume(&self, secret: &NonceSecret) -> Result<ConsumedNonce, NonceError>;
}
