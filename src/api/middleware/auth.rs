//! Bearer token and cookie authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::api::middleware::tracing::record_user;
use crate::{error::AppError, state::AppState};

/// Name of the cookie set by `POST /user/login`.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authenticates requests and attaches the caller's [`User`] to the request.
///
/// # Credential Sources
///
/// 1. `Authorization: Bearer <token>` header
/// 2. `access_token` cookie
///
/// The header wins when both are present.
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - No credential is present
/// - The token signature or expiry is invalid
/// - The token subject no longer exists
///
/// `WWW-Authenticate: Bearer` is added to 401 responses per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware, Extension};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/urls", get(list_links_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
///
/// [`User`]: crate::domain::entities::User
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = extract_token(&mut parts).await.ok_or_else(|| {
        AppError::unauthorized(
            "Not authenticated",
            json!({"reason": "Authorization header or access_token cookie is missing"}),
        )
    })?;

    let user = st.auth_service.resolve_token(&token).await?;
    record_user(&user.username);

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

async fn extract_token(parts: &mut Parts) -> Option<String> {
    if let Ok(AuthBearer(token)) = AuthBearer::from_request_parts(parts, &()).await {
        return Some(token);
    }

    CookieJar::from_headers(&parts.headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}
