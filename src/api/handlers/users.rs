//! Handlers for account registration and login.

use axum::{Form, Json, extract::State};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tracing::instrument;
use validator::Validate;

use crate::api::dto::auth::{LoginForm, RegisterRequest, RegisterResponse, TOKEN_TYPE, TokenResponse};
use crate::api::middleware::auth::ACCESS_TOKEN_COOKIE;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new user and returns a token for immediate use.
///
/// # Endpoint
///
/// `POST /user/create`
///
/// # Request Body
///
/// ```json
/// {
///   "first_name": "Alice",
///   "last_name": "Liddell",
///   "email": "alice@example.com",
///   "username": "alice",
///   "password": "wonderland"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the email or username is taken.
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    payload.validate()?;

    let (user, issued) = state.auth_service.register(payload.into()).await?;

    Ok(Json(RegisterResponse {
        detail: format!("User {} created successfully", user.username),
        token: issued.token,
        token_type: TOKEN_TYPE,
    }))
}

/// Exchanges a username and password for a token.
///
/// # Endpoint
///
/// `POST /user/login` with `application/x-www-form-urlencoded` body
/// `username=...&password=...`
///
/// The token is returned in the body and set as an HttpOnly `access_token`
/// cookie that lives as long as the token.
///
/// # Errors
///
/// Returns 401 Unauthorized on unknown user or wrong password.
#[instrument(skip(state, jar, form), fields(username = %form.username))]
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    let user = state
        .auth_service
        .authenticate(&form.username, &form.password)
        .await?;

    let issued = state.auth_service.issue_token(&user)?;

    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, issued.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            state.auth_service.token_ttl().num_seconds(),
        ));

    Ok((
        jar.add(cookie),
        Json(TokenResponse {
            token: issued.token,
            token_type: TOKEN_TYPE,
        }),
    ))
}
