//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::middleware::tracing::record_short_id;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::pages::not_found_page;

/// Redirects a short identifier to its target URL.
///
/// # Endpoint
///
/// `GET /{back_half_id}`
///
/// # Request Flow
///
/// 1. Increment the view count and read the target in one statement
/// 2. Return 302 Found with `Location: <target>`
///
/// Unknown identifiers get an HTML not-found page and change nothing.
///
/// # Errors
///
/// Returns 500 only on database failure.
pub async fn redirect_handler(
    Path(back_half_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    match state.link_service.resolve(&back_half_id).await? {
        Some(target_url) => {
            record_short_id(&back_half_id);
            debug!(id = %back_half_id, "Redirecting");
            Ok((StatusCode::FOUND, [(header::LOCATION, target_url)]).into_response())
        }
        None => Ok(not_found_page(back_half_id)),
    }
}
