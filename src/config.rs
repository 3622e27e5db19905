//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Database URL (content tables + staging tables)
    pub database_url: String,
    /// Author recorded on posts created by the importer
    pub post_author: String,
    /// Signing key for admin action nonces
    pub nonce_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            post_author: env::var("POST_AUTHOR").unwrap_or_else(|_| "admin".to_string()),
            nonce_key: env::var("ADMIN_NONCE_KEY")
                .map_err(|_| ConfigError::Missing("ADMIN_NONCE_KEY"))?
                .into_bytes(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            database_url: "sqlite::memory:".to_string(),
            post_author: "admin".to_string(),
            nonce_key: b"test_nonce_key_32_bytes_minimum!".to_vec(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
