//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup, validated, and passed by reference
//! to whatever needs it. Nothing reads the environment after that.
//!
//! ## Database location
//!
//! ```bash
//! export DATABASE_URL="sqlite://shorturls.db"
//! # or just the file name
//! export DB_NAME="shorturls.db"
//! ```
//!
//! If `DATABASE_URL` is not set, it is built from `DB_NAME`; if neither is set
//! the database lives in `shorturls.db` in the working directory.
//!
//! ## Required Variables
//!
//! - `SECRET_JWT_KEY` - HMAC secret used to sign bearer tokens
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `PUBLIC_BASE_URL` - Origin used to build short URLs (default: `http://localhost:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `ACCESS_TOKEN_EXPIRATION_DAYS` - Token lifetime in days (default: 7)
//! - `ID_MAX_ATTEMPTS` - Identifier allocation attempts before giving up (default: 10)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `DB_CONNECT_TIMEOUT` - Pool acquire timeout in seconds (default: 30)

use anyhow::{Context, Result};
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://shorturls.db";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    /// Scheme and host prepended to identifiers in API responses.
    pub public_base_url: String,
    pub log_level: String,
    pub log_format: String,
    /// HMAC secret for token signatures (`SECRET_JWT_KEY`). Must be non-empty.
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    /// Bound on identifier allocation retries.
    pub id_max_attempts: usize,

    // ── SqlitePool settings ─────────────────────────────────────────────────
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection from the pool in seconds.
    pub db_connect_timeout: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `SECRET_JWT_KEY` is missing.
    pub fn from_env() -> Result<Self> {
        let database_url = Self::load_database_url();

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let jwt_secret = env::var("SECRET_JWT_KEY").context("SECRET_JWT_KEY must be set")?;

        let token_ttl_days = env::var("ACCESS_TOKEN_EXPIRATION_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7);

        let id_max_attempts = env::var("ID_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let db_connect_timeout = env::var("DB_CONNECT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            database_url,
            listen_addr,
            public_base_url,
            log_level,
            log_format,
            jwt_secret,
            token_ttl_days,
            id_max_attempts,
            db_max_connections,
            db_connect_timeout,
        })
    }

    /// Resolves the database URL.
    ///
    /// Priority:
    /// 1. `DATABASE_URL`
    /// 2. `sqlite://` + `DB_NAME`
    /// 3. `sqlite://shorturls.db`
    pub fn load_database_url() -> String {
        if let Ok(url) = env::var("DATABASE_URL") {
            return url;
        }

        match env::var("DB_NAME") {
            Ok(name) if !name.is_empty() => format!("sqlite://{}", name),
            _ => DEFAULT_DATABASE_URL.to_string(),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range or malformed.
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        let base = url::Url::parse(&self.public_base_url)
            .with_context(|| format!("PUBLIC_BASE_URL is not a valid URL: '{}'", self.public_base_url))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            anyhow::bail!(
                "PUBLIC_BASE_URL must use http or https, got '{}'",
                self.public_base_url
            );
        }

        if self.jwt_secret.is_empty() {
            anyhow::bail!("SECRET_JWT_KEY must not be empty");
        }

        if self.token_ttl_days < 1 || self.token_ttl_days > 365 {
            anyhow::bail!(
                "ACCESS_TOKEN_EXPIRATION_DAYS must be between 1 and 365, got {}",
                self.token_ttl_days
            );
        }

        if self.id_max_attempts == 0 || self.id_max_attempts > 1000 {
            anyhow::bail!(
                "ID_MAX_ATTEMPTS must be between 1 and 1000, got {}",
                self.id_max_attempts
            );
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Lifetime of issued bearer tokens.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.token_ttl_days)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Public base URL: {}", self.public_base_url);
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  JWT secret: {}", mask_secret(&self.jwt_secret));
        tracing::info!("  Token lifetime: {} days", self.token_ttl_days);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks a secret for logging, keeping only its length visible.
fn mask_secret(secret: &str) -> String {
    format!("*** ({} chars)", secret.chars().count())
}

/// Loads and validates configuration from environment variables.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
