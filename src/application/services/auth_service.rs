//! Credential service: password hashing, login and bearer tokens.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::entities::{NewAccount, NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// JWT claim set. `sub` is the username.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// A signed bearer token and the moment it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Service for user registration, login and token validation.
///
/// Passwords are hashed with Argon2id and a per-user random salt. Tokens are
/// HS256 JWTs keyed by the server secret, with the username as subject.
pub struct AuthService<R: UserRepository> {
    repository: Arc<R>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl<R: UserRepository> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - user repository for DB operations
    /// - `signing_secret` - HMAC key for token signatures
    /// - `token_ttl` - lifetime of issued tokens
    pub fn new(repository: Arc<R>, signing_secret: &str, token_ttl: Duration) -> Self {
        Self {
            repository,
            encoding_key: EncodingKey::from_secret(signing_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(signing_secret.as_bytes()),
            token_ttl,
        }
    }

    /// Lifetime of issued tokens.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Registers a new account and issues its first token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email or username is taken.
    #[instrument(skip(self, account), fields(username = %account.username))]
    pub async fn register(&self, account: NewAccount) -> Result<(User, IssuedToken), AppError> {
        if self
            .repository
            .find_by_email(&account.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Email already in use",
                json!({ "email": account.email }),
            ));
        }

        if self
            .repository
            .find_by_username(&account.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Username is already in use",
                json!({ "username": account.username }),
            ));
        }

        let password_hash = hash_password(&account.password).await?;

        let user = self
            .repository
            .create(NewUser {
                username: account.username,
                email: account.email,
                first_name: account.first_name,
                last_name: account.last_name,
                password_hash,
            })
            .await?;

        let token = self.issue_token(&user)?;
        info!("Account created");

        Ok((user, token))
    }

    /// Checks a username/password pair.
    ///
    /// Unknown users and wrong passwords produce the same error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] on bad credentials.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AppError> {
        let Some(user) = self.repository.find_by_username(username).await? else {
            warn!("Login failed: unknown user");
            return Err(bad_credentials());
        };

        if !verify_password(password, &user.password_hash).await? {
            warn!("Login failed: wrong password");
            return Err(bad_credentials());
        }

        info!("User authenticated");
        Ok(user)
    }

    /// Issues a signed token for `user`.
    pub fn issue_token(&self, user: &User) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user.username.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(error = %e, "Token encoding failed");
                AppError::internal("Failed to issue token", json!({}))
            })?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validates a bearer token and loads its user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the signature or expiry is invalid,
    /// or the user no longer exists.
    pub async fn resolve_token(&self, token: &str) -> Result<User, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                warn!(error = %e, "Token rejected");
                invalid_token()
            })?;

        self.repository
            .find_by_username(&data.claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(username = %data.claims.sub, "Token subject no longer exists");
                invalid_token()
            })
    }

    /// Looks up a user by username.
    pub async fn find_user(&self, username: &str) -> Result<Option<User>, AppError> {
        self.repository.find_by_username(username).await
    }

    /// Lists all registered users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.repository.list().await
    }

    /// Replaces a user's password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty password and
    /// [`AppError::NotFound`] for unknown users.
    pub async fn change_password(&self, username: &str, password: &str) -> Result<(), AppError> {
        if password.is_empty() {
            return Err(AppError::bad_request(
                "Password must not be empty",
                json!({}),
            ));
        }

        let password_hash = hash_password(password).await?;

        if !self
            .repository
            .update_password(username, &password_hash)
            .await?
        {
            return Err(AppError::not_found(
                "User not found",
                json!({ "username": username }),
            ));
        }

        info!(username, "Password changed");
        Ok(())
    }
}

fn bad_credentials() -> AppError {
    AppError::unauthorized("Incorrect username or password", json!({}))
}

fn invalid_token() -> AppError {
    AppError::unauthorized("Could not validate credentials", json!({}))
}

/// Hashes a password with Argon2id and a random salt into a PHC string.
///
/// Runs on the blocking pool.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();

    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
    })
    .await
    .map_err(|e| AppError::internal("Password hashing task failed", json!({ "reason": e.to_string() })))?
    .map_err(|e| AppError::internal("Failed to hash password", json!({ "reason": e.to_string() })))
}

/// Verifies a password against a stored PHC string.
///
/// Runs on the blocking pool.
pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();

    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&password_hash)?;
        Ok::<bool, argon2::password_hash::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
        )
    })
    .await
    .map_err(|e| AppError::internal("Password verification task failed", json!({ "reason": e.to_string() })))?
    .map_err(|e| {
        tracing::error!(error = %e, "Stored password hash is unreadable");
        AppError::internal("Failed to verify password", json!({}))
    })
}
