//! HTML pages served on the public redirect route.

use askama::Template;
use askama_web::WebTemplate;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Page shown when a short link does not resolve.
///
/// Renders `templates/not_found.html`.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub code: String,
}

/// Renders the not-found page for `code` with status 404.
pub fn not_found_page(code: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate { code: code.into() },
    )
        .into_response()
}
