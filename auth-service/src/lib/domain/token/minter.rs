use std::sync::Arc;

use chrono::Duration;
use signer::AccessClaims;
use signer::TokenSigner;

use crate::domain::contact::ports::ContactDirectory;
use crate::domain::token::errors::AccessTokenError;
use crate::domain::user::models::UserId;

/// Stateless minter of short-lived signed access tokens.
///
/// Holds no state of its own: the linked contacts are read from the directory
/// at every mint, so a token never embeds a stale contact list, and the
/// signer stamps issuer and audience. Minted tokens are bearer credentials
/// that cannot be revoked individually; only their short lifetime limits
/// exposure.
pub struct AccessTokenMinter<CD>
where
    CD: ContactDirectory,
{
    contacts: Arc<CD>,
    signer: Arc<TokenSigner>,
    ttl: Duration,
}

impl<CD> AccessTokenMinter<CD>
where
    CD: ContactDirectory,
{
    /// Create a new minter.
    ///
    /// # Arguments
    /// * `contacts` - Directory the contact claim is read from
    /// * `signer` - Configured token signer, shared with verification
    /// * `ttl` - Lifetime of minted tokens
    pub fn new(contacts: Arc<CD>, signer: Arc<TokenSigner>, ttl: Duration) -> Self {
        Self {
            contacts,
            signer,
            ttl,
        }
    }

    /// Mint a signed access token for a user.
    ///
    /// # Arguments
    /// * `user_id` - Subject of the token
    ///
    /// # Returns
    /// Signed token string
    ///
    /// # Errors
    /// * `Contacts` - Reading the linked contacts failed
    /// * `Signing` - Token signing failed
    pub async fn mint(&self, user_id: &UserId) -> Result<String, AccessTokenError> {
        let linked = self.contacts.linked(user_id).await?;
        let contacts = linked
            .iter()
            .map(|contact| contact.as_str().to_string())
            .collect();

        let claims = AccessClaims::for_user(user_id, contacts, self.ttl.num_seconds());
        Ok(self.signer.sign(&claims)?)
    }
}
