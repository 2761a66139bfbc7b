use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use crate::auth::errors::AuthError;
use crate::auth::models::RefreshGrant;
use crate::auth::ports::AuthServicePort;
use crate::auth::ports::NotificationDispatcher;
use crate::domain::contact::models::Contact;
use crate::domain::contact::ports::ContactDirectory;
use crate::domain::nonce::models::NonceIntent;
use crate::domain::nonce::models::NonceSecret;
use crate::domain::nonce::ports::NonceStore;
use crate::domain::token::minter::AccessTokenMinter;
use crate::domain::token::models::RefreshSecret;
use crate::domain::token::ports::RefreshTokenStore;
use crate::domain::user::models::Account;
use crate::domain::user::models::Profile;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserStore;

/// Domain service implementation for authentication flows.
///
/// Concrete implementation of AuthServicePort with dependency injection.
/// Every store call is bounded by a timeout; a hung backend surfaces as an
/// internal error instead of a hung request.
pub struct AuthService<NS, CD, US, RS, ND>
where
    NS: NonceStore,
    CD: ContactDirectory,
    US: UserStore,
    RS: RefreshTokenStore,
    ND: NotificationDispatcher,
{
    nonces: Arc<NS>,
    contacts: Arc<CD>,
    users: Arc<US>,
    refresh_tokens: Arc<RS>,
    notifier: Arc<ND>,
    minter: AccessTokenMinter<CD>,
    store_timeout: Duration,
}

impl<NS, CD, US, RS, ND> AuthService<NS, CD, US, RS, ND>
where
    NS: NonceStore,
    CD: ContactDirectory,
    US: UserStore,
    RS: RefreshTokenStore,
    ND: NotificationDispatcher,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `nonces` - Nonce persistence implementation
    /// * `contacts` - Contact link persistence implementation
    /// * `users` - User persistence implementation
    /// * `refresh_tokens` - Refresh token persistence implementation
    /// * `notifier` - Nonce delivery implementation
    /// * `minter` - Access token minter, sharing the contact directory
    /// * `store_timeout` - Upper bound for a single store call
    ///
    /// # Returns
    /// Configured auth service instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        nonces: Arc<NS>,
        contacts: Arc<CD>,
        users: Arc<US>,
        refresh_tokens: Arc<RS>,
        notifier: Arc<ND>,
        minter: AccessTokenMinter<CD>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            nonces,
            contacts,
            users,
            refresh_tokens,
            notifier,
            minter,
            store_timeout,
        }
    }

    /// Run a store call under the configured timeout.
    async fn bounded<T, E>(
        &self,
        operation: impl Future<Output = Result<T, E>>,
    ) -> Result<T, AuthError>
    where
        AuthError: From<E>,
    {
        match timeout(self.store_timeout, operation).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => Err(AuthError::Internal("store call timed out".to_string())),
        }
    }

    /// Create a user and link their first contact, undoing the creation when
    /// the link cannot be taken.
    async fn register(
        &self,
        contact: Contact,
        profile: Option<Profile>,
    ) -> Result<UserId, AuthError> {
        let profile = profile.ok_or_else(|| {
            AuthError::Validation("A registration profile is required for a new user".to_string())
        })?;

        let user = self.bounded(self.users.create(profile)).await?;

        if let Err(link_err) = self.bounded(self.contacts.link(&user.id, &contact)).await {
            // A user without any contact is unreachable and must not survive
            if let Err(cleanup_err) = self.bounded(self.users.delete(&user.id)).await {
                tracing::error!(
                    user_id = %user.id,
                    error = %cleanup_err,
                    "Failed to remove user after contact link failure"
                );
            }
            return Err(link_err);
        }

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user.id)
    }
}

#[async_trait]
impl<NS, CD, US, RS, ND> AuthServicePort for AuthService<NS, CD, US, RS, ND>
where
    NS: NonceStore,
    CD: ContactDirectory,
    US: UserStore,
    RS: RefreshTokenStore,
    ND: NotificationDispatcher,
{
    async fn send_nonce(
        &self,
        contact: Contact,
        is_adding_contact: bool,
    ) -> Result<NonceIntent, AuthError> {
        let is_linked = self.bounded(self.contacts.exists(&contact)).await?;

        // A linked contact always signs its owner in, whatever the client asked for
        let intent = if is_linked {
            NonceIntent::ReturningUser
        } else if is_adding_contact {
            NonceIntent::AddingContact
        } else {
            NonceIntent::NewUser
        };

        let secret = self.bounded(self.nonces.issue(&contact, intent)).await?;
        self.notifier.send(&contact, &secret, intent).await?;

        tracing::debug!(contact = %contact, intent = %intent, "Nonce issued and dispatched");
        Ok(intent)
    }

    async fn exchange_nonce(
        &self,
        secret: NonceSecret,
        profile: Option<Profile>,
        caller: Option<UserId>,
    ) -> Result<RefreshGrant, AuthError> {
        let consumed = self.bounded(self.nonces.consume(&secret)).await?;

        let user_id = match consumed.intent {
            NonceIntent::NewUser => self.register(consumed.contact, profile).await?,
            NonceIntent::ReturningUser => self
                .bounded(self.contacts.find_owner(&consumed.contact))
                .await?
                .ok_or(AuthError::NotFound)?,
            NonceIntent::AddingContact => {
                let caller = caller.ok_or_else(|| {
                    AuthError::Validation(
                        "This nonce attaches a contact and must be redeemed by a signed-in user"
                            .to_string(),
                    )
                })?;
                self.bounded(self.contacts.link(&caller, &consumed.contact))
                    .await?;
                tracing::info!(user_id = %caller, contact = %consumed.contact, "Contact linked");
                caller
            }
        };

        let refresh_token = self.bounded(self.refresh_tokens.issue(&user_id)).await?;

        Ok(RefreshGrant {
            user_id,
            refresh_token,
        })
    }

    async fn exchange_refresh_token(&self, secret: RefreshSecret) -> Result<String, AuthError> {
        let owner = self
            .bounded(self.refresh_tokens.resolve_owner(&secret))
            .await?;
        let access_token = self.bounded(self.minter.mint(&owner)).await?;
        Ok(access_token)
    }

    async fn revoke(&self, caller: UserId) -> Result<(), AuthError> {
        self.bounded(self.refresh_tokens.revoke_all(&caller)).await?;
        tracing::info!(user_id = %caller, "All refresh tokens revoked");
        Ok(())
    }

    async fn remove_contact(&self, caller: UserId, contact: Contact) -> Result<(), AuthError> {
        self.bounded(self.contacts.unlink(&contact, &caller)).await?;
        tracing::info!(user_id = %caller, contact = %contact, "Contact unlinked");
        Ok(())
    }

    async fn get_account(&self, caller: UserId) -> Result<Account, AuthError> {
        let user = self
            .bounded(self.users.find(&caller))
            .await?
            .ok_or(AuthError::NotFound)?;
        let contacts = self.bounded(self.contacts.linked(&caller)).await?;
        Ok(Account { user, contacts })
    }

    async fn update_profile(&self, caller: UserId, profile: Profile) -> Result<(), AuthError> {
        self.bounded(self.users.update(&caller, profile)).await?;
        Ok(())
    }

    async fn delete_account(&self, caller: UserId) -> Result<(), AuthError> {
        self.bounded(self.users.delete(&caller)).await?;
        tracing::info!(user_id = %caller, "Account deleted");
        Ok(())
    }
}
