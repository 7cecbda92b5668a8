//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{back_half_id}`   - Short link redirect (public)
//! - `GET  /health`           - Health check (public)
//! - `/user/*`                - Registration and login (public, rate limited)
//! - `/api/v1/*`              - Link management (bearer token or cookie required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Authentication** - Bearer token or `access_token` cookie
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// Rate limiting keys on the peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer());

    let user_router = api::routes::user_routes().layer(rate_limit::layer());

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/{back_half_id}", get(redirect_handler))
        .nest("/api/v1", api_router)
        .nest("/user", user_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
