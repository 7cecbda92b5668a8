//! Handler for QR code images.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::qr::render_png;

/// Returns a PNG QR code encoding the link's target URL.
///
/// # Endpoint
///
/// `GET /api/v1/urls/{id}/qr`
///
/// # Errors
///
/// Returns 404 if the link doesn't exist.
pub async fn qr_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.get_link(&id).await?;

    let target_url = link.target_url;
    let png = tokio::task::spawn_blocking(move || render_png(&target_url))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "QR rendering task failed");
            AppError::internal("Failed to render QR code", serde_json::json!({}))
        })??;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
