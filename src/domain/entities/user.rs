//! User account entity.

use chrono::{DateTime, Utc};

/// A registered account. Only the password hash may change after creation.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string; salt and parameters are embedded.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for inserting a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Registration data as submitted by the client, with a plaintext password.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}
