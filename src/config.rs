//! Configuration module for the Anime List API
//!
//! Handles loading environment variables and application configuration.

use std::env;
use std::time::Duration;

/// Default access token lifetime (one hour)
const DEFAULT_JWT_EXPIRATION_SECS: i64 = 3600;

/// Default refresh token lifetime (seven days)
const DEFAULT_REFRESH_TOKEN_LIFE_SECS: i64 = 7 * 24 * 3600;

/// Default timeout for a single webhook delivery
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Token signing configuration
    pub jwt: JwtConfig,
    /// Public base URL used for absolute links
    pub base_url: String,
    /// Timeout applied to each outgoing webhook request
    pub webhook_timeout: Duration,
}

/// Secrets and lifetimes for access and refresh tokens
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 secret for access tokens
    pub access_secret: String,
    /// HS256 secret for refresh tokens
    pub refresh_secret: String,
    /// Access token lifetime in seconds
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_ttl_secs: i64,
}

impl JwtConfig {
    /// Build a config with default lifetimes, mostly useful in tests
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl_secs: DEFAULT_JWT_EXPIRATION_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TOKEN_LIFE_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Panics
    /// Panics if required environment variables are not set
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt = JwtConfig {
            access_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            refresh_secret: env::var("REFRESH_TOKEN_SECRET")
                .expect("REFRESH_TOKEN_SECRET must be set"),
            access_ttl_secs: env::var("JWT_EXPIRATION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_SECS),
            refresh_ttl_secs: env::var("REFRESH_TOKEN_LIFE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REFRESH_TOKEN_LIFE_SECS),
        };

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .expect("PORT must be a valid number");

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            jwt,
            base_url: env::var("BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            webhook_timeout: Duration::from_secs(
                env::var("WEBHOOK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_WEBHOOK_TIMEOUT_SECS),
            ),
        }
    }
}
