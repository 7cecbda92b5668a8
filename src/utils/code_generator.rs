//! Short identifier generation and validation utilities.
//!
//! Generated identifiers are 10 characters drawn uniformly from `[A-Za-z0-9]`
//! (about 59.5 bits of entropy). User-chosen back-halves may additionally use
//! underscores and be up to 255 characters long.

use crate::error::AppError;
use rand::{Rng, distr::Alphanumeric};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of generated identifiers.
pub const ID_LENGTH: usize = 10;

/// Pattern every stored identifier must match.
static BACK_HALF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,255}$").expect("valid back-half regex"));

/// Identifiers that would be shadowed by fixed routes.
const RESERVED_IDS: &[&str] = &["health"];

/// Generates a random short identifier.
///
/// Uses the thread-local CSPRNG.
///
/// # Examples
///
/// ```ignore
/// let id = generate_code();
/// assert_eq!(id.len(), 10);
/// assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Validates a user-provided back-half.
///
/// # Rules
///
/// - 1 to 255 characters
/// - ASCII letters, digits and underscores only
/// - Not a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_back_half(back_half: &str) -> Result<(), AppError> {
    if !BACK_HALF_REGEX.is_match(back_half) {
        return Err(AppError::bad_request(
            "Back half of URL must be alphanumeric between 1 and 255 characters",
            json!({ "back_half": back_half }),
        ));
    }

    if RESERVED_IDS.contains(&back_half) {
        return Err(AppError::bad_request(
            "This back half is reserved",
            json!({ "back_half": back_half }),
        ));
    }

    Ok(())
}

/// Validates a redirect target and returns its canonical serialization.
///
/// The stored form is what the URL parser produces, so tabs and newlines
/// stripped during parsing never reach a `Location` header.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for unparsable URLs or schemes other than
/// absolute `http`/`https`.
pub fn normalize_target_url(target: &str) -> Result<String, AppError> {
    let parsed = url::Url::parse(target).map_err(|e| {
        AppError::bad_request(
            "Invalid URL format",
            json!({ "original_URL": target, "reason": e.to_string() }),
        )
    })?;

    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(String::from(parsed)),
        scheme => Err(AppError::bad_request(
            "Only absolute http and https URLs can be shortened",
            json!({ "original_URL": target, "scheme": scheme }),
        )),
    }
}
