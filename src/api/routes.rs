//! API route configuration.
//!
//! Link management endpoints require authentication via
//! [`crate::api::middleware::auth`]; account endpoints are public.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, link_info_handler, list_links_handler,
    login_handler, qr_handler, register_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Link management routes, mounted under `/api/v1`.
///
/// # Endpoints
///
/// - `GET    /urls`             - List the caller's links
/// - `POST   /urls/create`      - Create a link
/// - `POST   /urls/update`      - Partially update a link
/// - `DELETE /urls/delete`      - Delete a link (`?url_id=`)
/// - `GET    /urls/{id}/qr`     - QR code PNG for a link
/// - `GET    /urls/{id}/info`   - Link with owner profile
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_links_handler))
        .route("/urls/create", post(create_link_handler))
        .route("/urls/update", post(update_link_handler))
        .route("/urls/delete", delete(delete_link_handler))
        .route("/urls/{id}/qr", get(qr_handler))
        .route("/urls/{id}/info", get(link_info_handler))
}

/// Account routes, mounted under `/user`.
///
/// # Endpoints
///
/// - `POST /create` - Register and receive a token
/// - `POST /login`  - Form login, sets the `access_token` cookie
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(register_handler))
        .route("/login", post(login_handler))
}
