//! Ownership rule shared by every link mutation.

use serde_json::json;

use crate::error::AppError;

/// Allows the request only when `requester` owns the resource.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] when the usernames differ.
pub fn authorize_owner(requester: &str, owner: &str) -> Result<(), AppError> {
    if requester == owner {
        return Ok(());
    }

    tracing::warn!(requester, owner, "Ownership check failed");
    Err(AppError::forbidden(
        "You do not own this short URL",
        json!({ "requester": requester }),
    ))
}
