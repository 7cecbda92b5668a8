//! Shared application state injected into every handler.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::application::services::{AuthService, LinkService};
use crate::infrastructure::persistence::{SqliteLinkRepository, SqliteUserRepository};

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<SqliteLinkRepository>>,
    pub auth_service: Arc<AuthService<SqliteUserRepository>>,
    pub pool: Arc<SqlitePool>,
    /// Origin used to render `short_url` fields, without a trailing slash.
    pub public_base_url: String,
}

impl AppState {
    /// Builds services on top of one shared pool.
    pub fn new(
        pool: Arc<SqlitePool>,
        jwt_secret: &str,
        token_ttl: chrono::Duration,
        id_max_attempts: usize,
        public_base_url: impl Into<String>,
    ) -> Self {
        let link_repository = Arc::new(SqliteLinkRepository::new(pool.clone()));
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));

        Self {
            link_service: Arc::new(
                LinkService::new(link_repository).with_max_attempts(id_max_attempts),
            ),
            auth_service: Arc::new(AuthService::new(user_repository, jwt_secret, token_ttl)),
            pool,
            public_base_url: public_base_url.into(),
        }
    }

    /// Public URL for an identifier.
    pub fn short_url(&self, id: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), id)
    }
}
