use std::sync::Arc;

use auth_service::domain::auth::service::AuthService;
use auth_service::domain::contact::models::Contact;
use auth_service::domain::nonce::models::NoncePolicy;
use auth_service::domain::token::minter::AccessTokenMinter;
use auth_service::domain::token::models::RotationPolicy;
use auth_service::domain::token::models::TokenPolicy;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::notify::CapturingDispatcher;
use auth_service::outbound::stores::InMemoryStore;
use chrono::Duration;
use reqwest::StatusCode;
use serde_json::json;
use signer::TokenSigner;

const TEST_SIGNING_KEY: &[u8] = b"test-signing-secret-at-least-32-bytes-long";

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub dispatcher: Arc<CapturingDispatcher>,
    pub token_signer: Arc<TokenSigner>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with(900, 3600, RotationPolicy::SingleActive).await
    }

    /// Spawn with explicit TTLs; a negative TTL makes credentials arrive
    /// already expired
    pub async fn spawn_with(
        nonce_ttl_secs: i64,
        refresh_ttl_secs: i64,
        rotation: RotationPolicy,
    ) -> Self {
        let store = Arc::new(InMemoryStore::new(
            NoncePolicy {
                secret_length: 32,
                ttl: Duration::seconds(nonce_ttl_secs),
            },
            TokenPolicy {
                secret_length: 64,
                ttl: Duration::seconds(refresh_ttl_secs),
                rotation,
            },
        ));
        let dispatcher = Arc::new(CapturingDispatcher::new());
        let token_signer = Arc::new(
            TokenSigner::hs256(TEST_SIGNING_KEY)
                .with_issuer("auth-service-tests")
                .with_audience("auth-service-test-clients"),
        );

        let minter = AccessTokenMinter::new(
            Arc::clone(&store),
            Arc::clone(&token_signer),
            Duration::seconds(300),
        );
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            store,
            Arc::clone(&dispatcher),
            minter,
            std::time::Duration::from_secs(5),
        ));

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(auth_service, Arc::clone(&token_signer));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            dispatcher,
            token_signer,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Request a nonce for `contact` and read it back from the captured
    /// notifications
    pub async fn request_nonce(&self, contact: &str) -> String {
        let response = self
            .post("/api/auth/send-nonce")
            .json(&json!({ "contact": contact }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);

        self.sent_nonce(contact).await
    }

    /// Request a contact-adding nonce for `contact`
    pub async fn request_adding_nonce(&self, contact: &str) -> String {
        let response = self
            .post("/api/auth/send-nonce")
            .json(&json!({ "contact": contact, "is_adding_contact": true }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);

        self.sent_nonce(contact).await
    }

    /// Full registration flow, returning (user_id, refresh_token)
    pub async fn register(&self, contact: &str, display_name: &str) -> (String, String) {
        let nonce = self.request_nonce(contact).await;

        let response = self
            .post("/api/auth/exchange-nonce")
            .json(&json!({
                "nonce": nonce,
                "profile": { "display_name": display_name }
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        (
            body["data"]["user_id"].as_str().unwrap().to_string(),
            body["data"]["refresh_token"].as_str().unwrap().to_string(),
        )
    }

    /// Exchange a refresh token for an access token
    pub async fn access_token(&self, refresh_token: &str) -> String {
        let response = self
            .post("/api/auth/refresh")
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    async fn sent_nonce(&self, contact: &str) -> String {
        let contact = Contact::new(contact.to_string()).expect("Invalid test contact");
        self.dispatcher
            .last_sent_to(&contact)
            .await
            .expect("No nonce was delivered")
            .secret
            .as_str()
            .to_string()
    }
}
