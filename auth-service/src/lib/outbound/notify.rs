use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::auth::errors::DispatchError;
use crate::domain::auth::ports::NotificationDispatcher;
use crate::domain::contact::models::Contact;
use crate::domain::nonce::models::NonceIntent;
use crate::domain::nonce::models::NonceSecret;

/// Delivery channel that writes nonces to the application log.
///
/// Stands in for an out-of-band sender (email, SMS) during development: the
/// operator copies the nonce from the server output. Unsuitable beyond that,
/// since the log would carry every sign-in credential.
pub struct TracingDispatcher;

#[async_trait]
impl NotificationDispatcher for TracingDispatcher {
    async fn send(
        &self,
        contact: &Contact,
        secret: &NonceSecret,
        intent: NonceIntent,
    ) -> Result<(), DispatchError> {
        tracing::info!("Nonce for {} ({}): {}", contact, intent, secret.as_str());
        Ok(())
    }
}

/// A notification captured by [`CapturingDispatcher`].
#[derive(Debug, Clone)]
pub struct SentNonce {
    pub contact: Contact,
    pub secret: NonceSecret,
    pub intent: NonceIntent,
}

/// Delivery channel that retains every nonce in memory.
///
/// Lets tests drive the full sign-in flow without an outbox: request a nonce
/// through the API, then read it back from the dispatcher.
#[derive(Default)]
pub struct CapturingDispatcher {
    sent: Mutex<Vec<SentNonce>>,
}

impl CapturingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications sent so far, oldest first.
    pub async fn sent(&self) -> Vec<SentNonce> {
        self.sent.lock().await.clone()
    }

    /// The most recent notification sent to the given contact.
    pub async fn last_sent_to(&self, contact: &Contact) -> Option<SentNonce> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|notification| notification.contact == *contact)
            .cloned()
    }
}

#[async_trait]
impl NotificationDispatcher for CapturingDispatcher {
    async fn send(
        &self,
        contact: &Contact,
        secret: &NonceSecret,
        intent: NonceIntent,
    ) -> Result<(), DispatchError> {
        self.sent.lock().await.push(SentNonce {
            contact: contact.clone(),
            secret: secret.clone(),
            intent,
        });
        Ok(())
    }
}
