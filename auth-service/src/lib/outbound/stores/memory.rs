use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use signer::SecretGenerator;
use tokio::sync::RwLock;

use crate::domain::contact::errors::ContactError;
use crate::domain::contact::models::Contact;
use crate::domain::contact::ports::ContactDirectory;
use crate::domain::nonce::errors::NonceError;
use crate::domain::nonce::models::ConsumedNonce;
use crate::domain::nonce::models::Nonce;
use crate::domain::nonce::models::NonceIntent;
use crate::domain::nonce::models::NoncePolicy;
use crate::domain::nonce::models::NonceSecret;
use crate::domain::nonce::ports::NonceStore;
use crate::domain::token::errors::RefreshTokenError;
use crate::domain::token::models::RefreshSecret;
use crate::domain::token::models::RefreshToken;
use crate::domain::token::models::RotationPolicy;
use crate::domain::token::models::TokenPolicy;
use crate::domain::token::ports::RefreshTokenStore;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::Profile;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserStore;

/// In-memory implementation of every persistence port.
///
/// Backs local development and the test suite; state is gone when the
/// process is. One lock guards all four maps, so cross-aggregate operations
/// (cascading deletes, link checks) are as atomic as their SQL counterparts.
pub struct InMemoryStore {
    state: RwLock<State>,
    nonce_policy: NoncePolicy,
    token_policy: TokenPolicy,
    nonce_generator: SecretGenerator,
    refresh_generator: SecretGenerator,
}

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    contacts: HashMap<Contact, UserId>,
    nonces: HashMap<Contact, Nonce>,
    refresh_tokens: HashMap<RefreshSecret, RefreshToken>,
}

impl InMemoryStore {
    pub fn new(nonce_policy: NoncePolicy, token_policy: TokenPolicy) -> Self {
        Self {
            state: RwLock::new(State::default()),
            nonce_generator: SecretGenerator::new(nonce_policy.secret_length),
            refresh_generator: SecretGenerator::new(token_policy.secret_length),
            nonce_policy,
            token_policy,
        }
    }
}

#[async_trait]
impl NonceStore for InMemoryStore {
    async fn issue(
        &self,
        contact: &Contact,
        intent: NonceIntent,
    ) -> Result<NonceSecret, NonceError> {
        let secret = NonceSecret::from(
            self.nonce_generator
                .generate()
                .map_err(|e| NonceError::Storage(e.to_string()))?,
        );

        let nonce = Nonce {
            contact: contact.clone(),
            secret: secret.clone(),
            intent,
            expires_at: Utc::now() + self.nonce_policy.ttl,
        };

        let mut state = self.state.write().await;
        // Keyed by contact, so inserting replaces any live nonce
        state.nonces.insert(contact.clone(), nonce);
        Ok(secret)
    }

    async fn consume(&self, secret: &NonceSecret) -> Result<ConsumedNonce, NonceError> {
        let mut state = self.state.write().await;

        let contact = state
            .nonces
            .iter()
            .find(|(_, nonce)| nonce.secret == *secret)
            .map(|(contact, _)| contact.clone())
            .ok_or(NonceError::NotFound)?;

        let nonce = state.nonces.remove(&contact).ok_or(NonceError::NotFound)?;
        if nonce.expires_at < Utc::now() {
            return Err(NonceError::Expired);
        }

        Ok(ConsumedNonce {
            contact: nonce.contact,
            intent: nonce.intent,
        })
    }
}

#[async_trait]
impl ContactDirectory for InMemoryStore {
    async fn exists(&self, contact: &Contact) -> Result<bool, ContactError> {
        Ok(self.state.read().await.contacts.contains_key(contact))
    }

    async fn find_owner(&self, contact: &Contact) -> Result<Option<UserId>, ContactError> {
        Ok(self.state.read().await.contacts.get(contact).copied())
    }

    async fn link(&self, user_id: &UserId, contact: &Contact) -> Result<(), ContactError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(user_id) {
            return Err(ContactError::OwnerNotFound);
        }
        match state.contacts.get(contact) {
            Some(owner) if owner == user_id => return Ok(()),
            Some(_) => return Err(ContactError::AlreadyLinked(contact.clone())),
            None => {}
        }

        state.contacts.insert(contact.clone(), *user_id);
        Ok(())
    }

    async fn unlink(&self, contact: &Contact, user_id: &UserId) -> Result<(), ContactError> {
        let mut state = self.state.write().await;

        match state.contacts.get(contact) {
            Some(owner) if owner == user_id => {}
            _ => return Err(ContactError::LinkNotFound(contact.clone())),
        }

        let remaining = state
            .contacts
            .values()
            .filter(|owner| **owner == *user_id)
            .count();
        if remaining <= 1 {
            return Err(ContactError::LastContact);
        }

        state.contacts.remove(contact);
        Ok(())
    }

    async fn linked(&self, user_id: &UserId) -> Result<Vec<Contact>, ContactError> {
        let state = self.state.read().await;
        let mut linked: Vec<Contact> = state
            .contacts
            .iter()
            .filter(|(_, owner)| **owner == *user_id)
            .map(|(contact, _)| contact.clone())
            .collect();
        linked.sort();
        Ok(linked)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create(&self, profile: Profile) -> Result<User, UserError> {
        let user = User {
            id: UserId::new(),
            profile,
            created_at: Utc::now(),
        };

        let mut state = self.state.write().await;
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn update(&self, id: &UserId, profile: Profile) -> Result<(), UserError> {
        let mut state = self.state.write().await;
        match state.users.get_mut(id) {
            Some(user) => {
                user.profile = profile;
                Ok(())
            }
            None => Err(UserError::NotFound(*id)),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut state = self.state.write().await;

        if state.users.remove(id).is_none() {
            return Err(UserError::NotFound(*id));
        }
        state.contacts.retain(|_, owner| *owner != *id);
        state.refresh_tokens.retain(|_, token| token.owner != *id);
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryStore {
    async fn issue(&self, user_id: &UserId) -> Result<RefreshSecret, RefreshTokenError> {
        let secret = RefreshSecret::from(
            self.refresh_generator
                .generate()
                .map_err(|e| RefreshTokenError::Storage(e.to_string()))?,
        );

        let token = RefreshToken {
            secret: secret.clone(),
            owner: *user_id,
            expires_at: Utc::now() + self.token_policy.ttl,
        };

        let mut state = self.state.write().await;
        if self.token_policy.rotation == RotationPolicy::SingleActive {
            state.refresh_tokens.retain(|_, existing| existing.owner != *user_id);
        }
        state.refresh_tokens.insert(secret.clone(), token);
        Ok(secret)
    }

    async fn resolve_owner(&self, secret: &RefreshSecret) -> Result<UserId, RefreshTokenError> {
        let mut state = self.state.write().await;

        let (owner, expires_at) = match state.refresh_tokens.get(secret) {
            Some(token) => (token.owner, token.expires_at),
            None => return Err(RefreshTokenError::NotFound),
        };

        if expires_at < Utc::now() {
            state.refresh_tokens.remove(secret);
            return Err(RefreshTokenError::Expired);
        }

        Ok(owner)
    }

    async fn revoke_all(&self, user_id: &UserId) -> Result<(), RefreshTokenError> {
        let mut state = self.state.write().await;
        state.refresh_tokens.retain(|_, token| token.owner != *user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::user::models::DisplayName;

    fn store() -> InMemoryStore {
        store_with(Duration::seconds(300), Duration::seconds(3600), RotationPolicy::SingleActive)
    }

    fn store_with(
        nonce_ttl: Duration,
        refresh_ttl: Duration,
        rotation: RotationPolicy,
    ) -> InMemoryStore {
        InMemoryStore::new(
            NoncePolicy {
                secret_length: 16,
                ttl: nonce_ttl,
            },
            TokenPolicy {
                secret_length: 32,
                ttl: refresh_ttl,
                rotation,
            },
        )
    }

    fn contact(raw: &str) -> Contact {
        Contact::new(raw.to_string()).unwrap()
    }

    fn profile(name: &str) -> Profile {
        Profile::new(DisplayName::new(name.to_string()).unwrap())
    }

    async fn user_with_contact(store: &InMemoryStore, raw: &str) -> UserId {
        let user = store.create(profile("Somebody")).await.unwrap();
        store.link(&user.id, &contact(raw)).await.unwrap();
        user.id
    }

    #[tokio::test]
    async fn test_issuing_supersedes_previous_nonce() {
        let store = store();
        let contact = contact("alice@example.com");

        let first = NonceStore::issue(&store, &contact, NonceIntent::NewUser)
            .await
            .unwrap();
        let second = NonceStore::issue(&store, &contact, NonceIntent::NewUser)
            .await
            .unwrap();
        assert_ne!(first, second);

        assert!(matches!(
            store.consume(&first).await,
            Err(NonceError::NotFound)
        ));
        assert!(store.consume(&second).await.is_ok());
    }

    #[tokio::test]
    async fn test_nonce_is_single_use() {
        let store = store();
        let contact = contact("alice@example.com");

        let secret = NonceStore::issue(&store, &contact, NonceIntent::ReturningUser)
            .await
            .unwrap();

        let consumed = store.consume(&secret).await.unwrap();
        assert_eq!(consumed.contact, contact);
        assert_eq!(consumed.intent, NonceIntent::ReturningUser);

        assert!(matches!(
            store.consume(&secret).await,
            Err(NonceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_expired_nonce_reported_once_then_gone() {
        let store = store_with(
            Duration::seconds(-60),
            Duration::seconds(3600),
            RotationPolicy::SingleActive,
        );

        let secret = NonceStore::issue(&store, &contact("late@example.com"), NonceIntent::NewUser)
            .await
            .unwrap();

        assert!(matches!(
            store.consume(&secret).await,
            Err(NonceError::Expired)
        ));
        assert!(matches!(
            store.consume(&secret).await,
            Err(NonceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_unknown_nonce_secret() {
        let store = store();
        let result = store
            .consume(&NonceSecret::from("no-such-secret".to_string()))
            .await;
        assert!(matches!(result, Err(NonceError::NotFound)));
    }

    #[tokio::test]
    async fn test_link_is_exclusive_but_idempotent() {
        let store = store();
        let first = store.create(profile("First")).await.unwrap();
        let second = store.create(profile("Second")).await.unwrap();
        let shared = contact("shared@example.com");

        store.link(&first.id, &shared).await.unwrap();
        // Relinking to the same owner changes nothing
        store.link(&first.id, &shared).await.unwrap();

        assert!(matches!(
            store.link(&second.id, &shared).await,
            Err(ContactError::AlreadyLinked(_))
        ));
        assert_eq!(store.find_owner(&shared).await.unwrap(), Some(first.id));
    }

    #[tokio::test]
    async fn test_link_requires_existing_owner() {
        let store = store();
        let result = store
            .link(&UserId::new(), &contact("orphan@example.com"))
            .await;
        assert!(matches!(result, Err(ContactError::OwnerNotFound)));
    }

    #[tokio::test]
    async fn test_unlink_refuses_missing_link() {
        let store = store();
        let user = user_with_contact(&store, "alice@example.com").await;

        let result = store.unlink(&contact("other@example.com"), &user).await;
        assert!(matches!(result, Err(ContactError::LinkNotFound(_))));
    }

    #[tokio::test]
    async fn test_unlink_refuses_foreign_link() {
        let store = store();
        user_with_contact(&store, "owner@example.com").await;
        let intruder = user_with_contact(&store, "intruder@example.com").await;

        let result = store.unlink(&contact("owner@example.com"), &intruder).await;
        assert!(matches!(result, Err(ContactError::LinkNotFound(_))));
    }

    #[tokio::test]
    async fn test_unlink_refuses_last_contact() {
        let store = store();
        let user = user_with_contact(&store, "only@example.com").await;

        let result = store.unlink(&contact("only@example.com"), &user).await;
        assert!(matches!(result, Err(ContactError::LastContact)));
    }

    #[tokio::test]
    async fn test_unlink_removes_spare_contact() {
        let store = store();
        let user = user_with_contact(&store, "first@example.com").await;
        store.link(&user, &contact("second@example.com")).await.unwrap();

        store.unlink(&contact("second@example.com"), &user).await.unwrap();

        assert!(!store.exists(&contact("second@example.com")).await.unwrap());
        assert!(store.exists(&contact("first@example.com")).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_unlinks_spare_the_final_contact() {
        let store = store();
        let user = user_with_contact(&store, "first@example.com").await;
        store.link(&user, &contact("second@example.com")).await.unwrap();

        let first_contact = contact("first@example.com");
        let second_contact = contact("second@example.com");
        let (first, second) = tokio::join!(
            store.unlink(&first_contact, &user),
            store.unlink(&second_contact, &user)
        );

        // One removal wins; the other must hit the sole-contact rule
        assert!(first.is_ok() != second.is_ok());
        assert!(matches!(
            first.and(second),
            Err(ContactError::LastContact)
        ));
        assert_eq!(store.linked(&user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_linked_returns_sorted_contacts() {
        let store = store();
        let user = user_with_contact(&store, "zed@example.com").await;
        store.link(&user, &contact("abe@example.com")).await.unwrap();

        let linked = store.linked(&user).await.unwrap();
        assert_eq!(
            linked,
            vec![contact("abe@example.com"), contact("zed@example.com")]
        );
    }

    #[tokio::test]
    async fn test_update_replaces_profile() {
        let store = store();
        let user = store.create(profile("Before")).await.unwrap();

        store.update(&user.id, profile("After")).await.unwrap();

        let found = store.find(&user.id).await.unwrap().unwrap();
        assert_eq!(found.profile.display_name.as_str(), "After");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let store = store();
        let result = store.update(&UserId::new(), profile("Ghost")).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_cascades_contacts_and_tokens() {
        let store = store();
        let user = user_with_contact(&store, "alice@example.com").await;
        let token = RefreshTokenStore::issue(&store, &user).await.unwrap();

        store.delete(&user).await.unwrap();

        assert!(store.find(&user).await.unwrap().is_none());
        assert!(!store.exists(&contact("alice@example.com")).await.unwrap());
        assert!(matches!(
            store.resolve_owner(&token).await,
            Err(RefreshTokenError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let store = store();
        let result = store.delete(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_single_active_rotation_displaces_previous_token() {
        let store = store();
        let user = store.create(profile("Alice")).await.unwrap();

        let first = RefreshTokenStore::issue(&store, &user.id).await.unwrap();
        let second = RefreshTokenStore::issue(&store, &user.id).await.unwrap();

        assert!(matches!(
            store.resolve_owner(&first).await,
            Err(RefreshTokenError::NotFound)
        ));
        assert_eq!(store.resolve_owner(&second).await.unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_multi_device_rotation_keeps_previous_tokens() {
        let store = store_with(
            Duration::seconds(300),
            Duration::seconds(3600),
            RotationPolicy::MultiDevice,
        );
        let user = store.create(profile("Alice")).await.unwrap();

        let first = RefreshTokenStore::issue(&store, &user.id).await.unwrap();
        let second = RefreshTokenStore::issue(&store, &user.id).await.unwrap();

        assert_eq!(store.resolve_owner(&first).await.unwrap(), user.id);
        assert_eq!(store.resolve_owner(&second).await.unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_expired_refresh_token_reported_once_then_gone() {
        let store = store_with(
            Duration::seconds(300),
            Duration::seconds(-60),
            RotationPolicy::SingleActive,
        );
        let user = store.create(profile("Alice")).await.unwrap();

        let secret = RefreshTokenStore::issue(&store, &user.id).await.unwrap();

        assert!(matches!(
            store.resolve_owner(&secret).await,
            Err(RefreshTokenError::Expired)
        ));
        assert!(matches!(
            store.resolve_owner(&secret).await,
            Err(RefreshTokenError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_revoke_all_clears_every_token() {
        let store = store_with(
            Duration::seconds(300),
            Duration::seconds(3600),
            RotationPolicy::MultiDevice,
        );
        let user = store.create(profile("Alice")).await.unwrap();

        let first = RefreshTokenStore::issue(&store, &user.id).await.unwrap();
        let second = RefreshTokenStore::issue(&store, &user.id).await.unwrap();

        store.revoke_all(&user.id).await.unwrap();

        assert!(matches!(
            store.resolve_owner(&first).await,
            Err(RefreshTokenError::NotFound)
        ));
        assert!(matches!(
            store.resolve_owner(&second).await,
            Err(RefreshTokenError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_refresh_token_is_multi_use() {
        let store = store();
        let user = store.create(profile("Alice")).await.unwrap();

        let secret = RefreshTokenStore::issue(&store, &user.id).await.unwrap();

        assert_eq!(store.resolve_owner(&secret).await.unwrap(), user.id);
        assert_eq!(store.resolve_owner(&secret).await.unwrap(), user.id);
    }
}
