#![allow(dead_code)]

use axum::{Router, middleware, routing::get};
use axum_test::TestServer;
use shortlink::api::handlers::{health_handler, redirect_handler};
use shortlink::api::middleware::auth;
use shortlink::api::routes::{protected_routes, user_routes};
use shortlink::domain::entities::NewAccount;
use shortlink::state::AppState;
use sqlx::SqlitePool;
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const TEST_BASE_URL: &str = "http://s.test";
pub const TEST_PASSWORD: &str = "correct horse battery staple";

pub fn create_test_state(pool: SqlitePool) -> AppState {
    AppState::new(
        Arc::new(pool),
        TEST_SECRET,
        chrono::Duration::days(7),
        10,
        TEST_BASE_URL,
    )
}

/// Full application router without rate limiting.
///
/// The governor layers key on the peer address, which the in-memory test
/// transport doesn't provide.
pub fn create_test_router(state: AppState) -> Router {
    let api = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .route("/{back_half_id}", get(redirect_handler))
        .nest("/api/v1", api)
        .nest("/user", user_routes())
        .with_state(state)
}

pub fn make_server(pool: SqlitePool) -> (TestServer, AppState) {
    let state = create_test_state(pool);
    let server = TestServer::new(create_test_router(state.clone())).unwrap();
    (server, state)
}

/// Registers `username` and returns a bearer token for it.
pub async fn create_test_user(state: &AppState, username: &str) -> String {
    let (_, issued) = state
        .auth_service
        .register(NewAccount {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: "Test".to_string(),
            last_name: username.to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap();

    issued.token
}

/// Inserts a user row directly, bypassing password hashing.
pub async fn insert_user(pool: &SqlitePool, username: &str) {
    sqlx::query(
        "INSERT INTO users (username, email, first_name, last_name, password_hash, created_at)
         VALUES (?1, ?2, 'Test', 'User', 'not-a-hash', ?3)",
    )
    .bind(username)
    .bind(format!("{username}@example.com"))
    .bind(chrono::Utc::now())
    .execute(pool)
    .await
    .unwrap();
}

pub async fn create_test_link(pool: &SqlitePool, id: &str, url: &str, owner: &str) {
    sqlx::query(
        "INSERT INTO short_links (id, title, target_url, created_at, view_count, owner)
         VALUES (?1, NULL, ?2, ?3, 0, ?4)",
    )
    .bind(id)
    .bind(url)
    .bind(chrono::Utc::now())
    .bind(owner)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn view_count(pool: &SqlitePool, id: &str) -> i64 {
    sqlx::query_scalar("SELECT view_count FROM short_links WHERE id = ?1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn link_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
