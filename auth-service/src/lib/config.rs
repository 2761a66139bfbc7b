use std::env;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::nonce::models::NoncePolicy;
use crate::domain::token::models::RotationPolicy;
use crate::domain::token::models::TokenPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default)]
    pub database_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub nonce: NonceConfig,
    pub refresh_token: RefreshTokenConfig,
    pub access_token: AccessTokenConfig,
    pub store_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NonceConfig {
    pub length: usize,
    pub ttl_secs: i64,
}

impl NonceConfig {
    pub fn policy(&self) -> NoncePolicy {
        NoncePolicy {
            secret_length: self.length,
            ttl: Duration::seconds(self.ttl_secs),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshTokenConfig {
    pub length: usize,
    pub ttl_secs: i64,
    pub rotation: RotationPolicy,
}

impl RefreshTokenConfig {
    pub fn policy(&self) -> TokenPolicy {
        TokenPolicy {
            secret_length: self.length,
            ttl: Duration::seconds(self.ttl_secs),
            rotation: self.rotation,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccessTokenConfig {
    pub secret: String,
    pub ttl_secs: i64,
    pub issuer: String,
    pub audience: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (STORAGE__BACKEND, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: STORAGE__DATABASE_URL=postgres://... overrides storage.database_url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}
