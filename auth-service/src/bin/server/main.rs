use std::sync::Arc;
use std::time::Duration;

use auth_service::config::Config;
use auth_service::config::StorageBackend;
use auth_service::domain::auth::ports::AuthServicePort;
use auth_service::domain::auth::service::AuthService;
use auth_service::domain::token::minter::AccessTokenMinter;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::notify::TracingDispatcher;
use auth_service::outbound::stores::InMemoryStore;
use auth_service::outbound::stores::PostgresContactDirectory;
use auth_service::outbound::stores::PostgresNonceStore;
use auth_service::outbound::stores::PostgresRefreshTokenStore;
use auth_service::outbound::stores::PostgresUserStore;
use signer::TokenSigner;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    // The signing secret stays out of the log on purpose
    tracing::info!(
        http_port = config.server.http_port,
        storage = ?config.storage.backend,
        nonce_ttl_secs = config.auth.nonce.ttl_secs,
        refresh_ttl_secs = config.auth.refresh_token.ttl_secs,
        access_ttl_secs = config.auth.access_token.ttl_secs,
        rotation = ?config.auth.refresh_token.rotation,
        "Configuration loaded"
    );

    let token_signer = Arc::new(
        TokenSigner::hs256(config.auth.access_token.secret.as_bytes())
            .with_issuer(config.auth.access_token.issuer.clone())
            .with_audience(config.auth.access_token.audience.clone()),
    );
    let access_ttl = chrono::Duration::seconds(config.auth.access_token.ttl_secs);
    let store_timeout = Duration::from_millis(config.auth.store_timeout_ms);

    let auth_service: Arc<dyn AuthServicePort> = match config.storage.backend {
        StorageBackend::Memory => {
            let store = Arc::new(InMemoryStore::new(
                config.auth.nonce.policy(),
                config.auth.refresh_token.policy(),
            ));
            tracing::info!(storage = "memory", "State will not survive a restart");

            let minter =
                AccessTokenMinter::new(Arc::clone(&store), Arc::clone(&token_signer), access_ttl);

            Arc::new(AuthService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&store),
                store,
                Arc::new(TracingDispatcher),
                minter,
                store_timeout,
            ))
        }
        StorageBackend::Postgres => {
            let database_url = config.storage.database_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("storage.database_url is required for the postgres backend")
            })?;

            let pg_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            tracing::info!(
                max_connections = 5,
                database = "postgresql",
                "Database connection pool created"
            );

            let nonces = Arc::new(PostgresNonceStore::new(
                pg_pool.clone(),
                config.auth.nonce.policy(),
            ));
            let contacts = Arc::new(PostgresContactDirectory::new(pg_pool.clone()));
            let users = Arc::new(PostgresUserStore::new(pg_pool.clone()));
            let refresh_tokens = Arc::new(PostgresRefreshTokenStore::new(
                pg_pool,
                config.auth.refresh_token.policy(),
            ));

            let minter =
                AccessTokenMinter::new(Arc::clone(&contacts), Arc::clone(&token_signer), access_ttl);

            Arc::new(AuthService::new(
                nonces,
                contacts,
                users,
                refresh_tokens,
                Arc::new(TracingDispatcher),
                minter,
                store_timeout,
            ))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, token_signer);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
