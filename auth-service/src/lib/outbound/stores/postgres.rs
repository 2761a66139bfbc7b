use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use signer::SecretGenerator;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::contact::errors::ContactError;
use crate::domain::contact::models::Contact;
use crate::domain::contact::ports::ContactDirectory;
use crate::domain::nonce::errors::NonceError;
use crate::domain::nonce::models::ConsumedNonce;
use crate::domain::nonce::models::NonceIntent;
use crate::domain::nonce::models::NoncePolicy;
use crate::domain::nonce::models::NonceSecret;
use crate::domain::nonce::ports::NonceStore;
use crate::domain::token::errors::RefreshTokenError;
use crate::domain::token::models::RefreshSecret;
use crate::domain::token::models::RotationPolicy;
use crate::domain::token::models::TokenPolicy;
use crate::domain::token::ports::RefreshTokenStore;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::Profile;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserStore;

pub struct PostgresNonceStore {
    pool: PgPool,
    policy: NoncePolicy,
    generator: SecretGenerator,
}

impl PostgresNonceStore {
    pub fn new(pool: PgPool, policy: NoncePolicy) -> Self {
        Self {
            pool,
            generator: SecretGenerator::new(policy.secret_length),
            policy,
        }
    }
}

#[async_trait]
impl NonceStore for PostgresNonceStore {
    async fn issue(
        &self,
        contact: &Contact,
        intent: NonceIntent,
    ) -> Result<NonceSecret, NonceError> {
        let secret = NonceSecret::from(
            self.generator
                .generate()
                .map_err(|e| NonceError::Storage(e.to_string()))?,
        );
        let expires_at = Utc::now() + self.policy.ttl;

        // Upsert keyed by contact, so issuing replaces any live nonce
        sqlx::query(
            r#"
            INSERT INTO nonces (contact, secret, intent, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (contact) DO UPDATE
            SET secret = EXCLUDED.secret,
                intent = EXCLUDED.intent,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(contact.as_str())
        .bind(secret.as_str())
        .bind(intent.as_str())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| NonceError::Storage(e.to_string()))?;

        Ok(secret)
    }

    async fn consume(&self, secret: &NonceSecret) -> Result<ConsumedNonce, NonceError> {
        // Single-statement take: under concurrent presentations exactly one
        // caller gets the row back
        let row = sqlx::query(
            r#"
            DELETE FROM nonces
            WHERE secret = $1
            RETURNING contact, intent, expires_at
            "#,
        )
        .bind(secret.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| NonceError::Storage(e.to_string()))?;

        let row = row.ok_or(NonceError::NotFound)?;

        let expires_at: DateTime<Utc> = row
            .try_get("expires_at")
            .map_err(|e| NonceError::Storage(e.to_string()))?;
        if expires_at < Utc::now() {
            return Err(NonceError::Expired);
        }

        let contact: String = row
            .try_get("contact")
            .map_err(|e| NonceError::Storage(e.to_string()))?;
        let intent: String = row
            .try_get("intent")
            .map_err(|e| NonceError::Storage(e.to_string()))?;

        Ok(ConsumedNonce {
            contact: Contact::new(contact).map_err(|e| NonceError::Storage(e.to_string()))?,
            intent: intent
                .parse::<NonceIntent>()
                .map_err(|e| NonceError::Storage(e.to_string()))?,
        })
    }
}

pub struct PostgresContactDirectory {
    pool: PgPool,
}

impl PostgresContactDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactDirectory for PostgresContactDirectory {
    async fn exists(&self, contact: &Contact) -> Result<bool, ContactError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM contacts WHERE value = $1)")
            .bind(contact.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ContactError::Storage(e.to_string()))?;

        row.try_get(0)
            .map_err(|e| ContactError::Storage(e.to_string()))
    }

    async fn find_owner(&self, contact: &Contact) -> Result<Option<UserId>, ContactError> {
        let row = sqlx::query("SELECT user_id FROM contacts WHERE value = $1")
            .bind(contact.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ContactError::Storage(e.to_string()))?;

        match row {
            Some(row) => {
                let user_id: Uuid = row
                    .try_get("user_id")
                    .map_err(|e| ContactError::Storage(e.to_string()))?;
                Ok(Some(UserId(user_id)))
            }
            None => Ok(None),
        }
    }

    async fn link(&self, user_id: &UserId, contact: &Contact) -> Result<(), ContactError> {
        let result = sqlx::query(
            r#"
            INSERT INTO contacts (value, user_id)
            VALUES ($1, $2)
            ON CONFLICT (value) DO NOTHING
            "#,
        )
        .bind(contact.as_str())
        .bind(user_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return ContactError::OwnerNotFound;
                }
            }
            ContactError::Storage(e.to_string())
        })?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        // The insert lost; linking is still fine when the winner is us
        match self.find_owner(contact).await? {
            Some(owner) if owner == *user_id => Ok(()),
            Some(_) => Err(ContactError::AlreadyLinked(contact.clone())),
            None => Err(ContactError::Storage(
                "contact link raced with a concurrent removal".to_string(),
            )),
        }
    }

    async fn unlink(&self, contact: &Contact, user_id: &UserId) -> Result<(), ContactError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ContactError::Storage(e.to_string()))?;

        // Lock the user's contact rows before checking: concurrent removals
        // serialize here. An unlocked count reads its own snapshot and would
        // let two removals of different contacts strip the user to zero.
        let rows = sqlx::query("SELECT value FROM contacts WHERE user_id = $1 FOR UPDATE")
            .bind(user_id.0)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| ContactError::Storage(e.to_string()))?;

        let held = rows
            .into_iter()
            .map(|row| {
                let value: String = row
                    .try_get("value")
                    .map_err(|e| ContactError::Storage(e.to_string()))?;
                Ok(value)
            })
            .collect::<Result<Vec<_>, ContactError>>()?;

        if !held.iter().any(|value| value == contact.as_str()) {
            return Err(ContactError::LinkNotFound(contact.clone()));
        }
        if held.len() <= 1 {
            return Err(ContactError::LastContact);
        }

        sqlx::query("DELETE FROM contacts WHERE value = $1 AND user_id = $2")
            .bind(contact.as_str())
            .bind(user_id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| ContactError::Storage(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| ContactError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn linked(&self, user_id: &UserId) -> Result<Vec<Contact>, ContactError> {
        let rows = sqlx::query("SELECT value FROM contacts WHERE user_id = $1 ORDER BY value")
            .bind(user_id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ContactError::Storage(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let value: String = row
                    .try_get("value")
                    .map_err(|e| ContactError::Storage(e.to_string()))?;
                Contact::new(value)
            })
            .collect()
    }
}

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn create(&self, profile: Profile) -> Result<User, UserError> {
        let user = User {
            id: UserId::new(),
            profile,
            created_at: Utc::now(),
        };
        let attributes = serde_json::to_value(&user.profile.attributes)
            .map_err(|e| UserError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, display_name, attributes, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id.0)
        .bind(user.profile.display_name.as_str())
        .bind(attributes)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

        Ok(user)
    }

    async fn find(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT display_name, attributes, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

        match row {
            Some(row) => {
                let display_name: String = row
                    .try_get("display_name")
                    .map_err(|e| UserError::Storage(e.to_string()))?;
                let attributes: serde_json::Value = row
                    .try_get("attributes")
                    .map_err(|e| UserError::Storage(e.to_string()))?;
                let created_at: DateTime<Utc> = row
                    .try_get("created_at")
                    .map_err(|e| UserError::Storage(e.to_string()))?;

                Ok(Some(User {
                    id: *id,
                    profile: Profile {
                        display_name: DisplayName::new(display_name)?,
                        attributes: serde_json::from_value(attributes)
                            .map_err(|e| UserError::Storage(e.to_string()))?,
                    },
                    created_at,
                }))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, id: &UserId, profile: Profile) -> Result<(), UserError> {
        let attributes = serde_json::to_value(&profile.attributes)
            .map_err(|e| UserError::Storage(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET display_name = $2, attributes = $3
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(profile.display_name.as_str())
        .bind(attributes)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(*id));
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        // Contacts and refresh tokens go through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(*id));
        }
        Ok(())
    }
}

pub struct PostgresRefreshTokenStore {
    pool: PgPool,
    policy: TokenPolicy,
    generator: SecretGenerator,
}

impl PostgresRefreshTokenStore {
    pub fn new(pool: PgPool, policy: TokenPolicy) -> Self {
        Self {
            pool,
            generator: SecretGenerator::new(policy.secret_length),
            policy,
        }
    }
}

#[async_trait]
impl RefreshTokenStore for PostgresRefreshTokenStore {
    async fn issue(&self, user_id: &UserId) -> Result<RefreshSecret, RefreshTokenError> {
        let secret = RefreshSecret::from(
            self.generator
                .generate()
                .map_err(|e| RefreshTokenError::Storage(e.to_string()))?,
        );
        let expires_at = Utc::now() + self.policy.ttl;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RefreshTokenError::Storage(e.to_string()))?;

        if self.policy.rotation == RotationPolicy::SingleActive {
            sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
                .bind(user_id.0)
                .execute(&mut *tx)
                .await
                .map_err(|e| RefreshTokenError::Storage(e.to_string()))?;
        }

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (secret, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(secret.as_str())
        .bind(user_id.0)
        .bind(expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RefreshTokenError::Storage(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RefreshTokenError::Storage(e.to_string()))?;

        Ok(secret)
    }

    async fn resolve_owner(&self, secret: &RefreshSecret) -> Result<UserId, RefreshTokenError> {
        let row = sqlx::query("SELECT user_id, expires_at FROM refresh_tokens WHERE secret = $1")
            .bind(secret.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RefreshTokenError::Storage(e.to_string()))?;

        let row = row.ok_or(RefreshTokenError::NotFound)?;

        let expires_at: DateTime<Utc> = row
            .try_get("expires_at")
            .map_err(|e| RefreshTokenError::Storage(e.to_string()))?;
        if expires_at < Utc::now() {
            // Purge so later presentations report NotFound
            sqlx::query("DELETE FROM refresh_tokens WHERE secret = $1")
                .bind(secret.as_str())
                .execute(&self.pool)
                .await
                .map_err(|e| RefreshTokenError::Storage(e.to_string()))?;
            return Err(RefreshTokenError::Expired);
        }

        let user_id: Uuid = row
            .try_get("user_id")
            .map_err(|e| RefreshTokenError::Storage(e.to_string()))?;
        Ok(UserId(user_id))
    }

    async fn revoke_all(&self, user_id: &UserId) -> Result<(), RefreshTokenError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| RefreshTokenError::Storage(e.to_string()))?;
        Ok(())
    }
}
