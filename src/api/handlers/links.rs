//! Handlers for short link management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::api::dto::links::{
    CreateLinkRequest, DeleteLinkQuery, DetailResponse, LinkInfoResponse, LinkResponse,
    UpdateLinkRequest,
};
use crate::domain::entities::{ShortLink, User};
use crate::error::AppError;
use crate::state::AppState;

fn to_response(state: &AppState, link: ShortLink) -> LinkResponse {
    let short_url = state.short_url(&link.id);
    LinkResponse::new(link, short_url)
}

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/v1/urls/create`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Docs",            // optional
///   "back_half": "docs",        // optional, generated when absent
///   "original_URL": "https://docs.rs"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the back-half or target URL is invalid
/// - 409 if the back-half is taken
/// - 503 if no free identifier could be allocated
#[instrument(skip(state, user, payload), fields(owner = %user.username))]
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state
        .link_service
        .create_link(&user.username, payload.into())
        .await?;

    Ok(Json(to_response(&state, link)))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/v1/urls`
///
/// # Errors
///
/// Returns 404 if the caller owns no links.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_links(&user.username).await?;

    Ok(Json(
        links
            .into_iter()
            .map(|link| to_response(&state, link))
            .collect(),
    ))
}

/// Deletes one of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/v1/urls/delete?url_id={id}`
///
/// # Errors
///
/// - 404 if the link doesn't exist
/// - 403 if the caller doesn't own it
#[instrument(skip(state, user), fields(owner = %user.username))]
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<DeleteLinkQuery>,
) -> Result<Json<DetailResponse>, AppError> {
    state
        .link_service
        .delete_link(&user.username, &query.url_id)
        .await?;

    Ok(Json(DetailResponse {
        detail: "Short URL deleted successfully".to_string(),
    }))
}

/// Partially updates one of the caller's links.
///
/// # Endpoint
///
/// `POST /api/v1/urls/update`
///
/// # Request Body
///
/// ```json
/// {
///   "id": "docs",
///   "content": { "title": "Rust docs", "back_half": "rustdocs", "original_URL": "" }
/// }
/// ```
///
/// Empty or absent fields keep their stored value.
///
/// # Errors
///
/// - 404 if the link doesn't exist
/// - 403 if the caller doesn't own it
/// - 400 if a new back-half or target URL is invalid
/// - 409 if the new back-half is taken
#[instrument(skip(state, user, payload), fields(owner = %user.username, id = %payload.id))]
pub async fn update_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state
        .link_service
        .update_link(&user.username, &payload.id, payload.content.into())
        .await?;

    Ok(Json(to_response(&state, link)))
}

/// Returns a link with its owner's public profile.
///
/// # Endpoint
///
/// `GET /api/v1/urls/{id}/info`
///
/// Any authenticated user may read link info.
///
/// # Errors
///
/// Returns 404 if the link doesn't exist.
pub async fn link_info_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LinkInfoResponse>, AppError> {
    let link = state.link_service.get_link(&id).await?;
    let owner = state.auth_service.find_user(&link.owner).await?;

    Ok(Json(LinkInfoResponse {
        link: to_response(&state, link),
        owner: owner.map(Into::into),
    }))
}
