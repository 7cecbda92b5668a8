//! Repository trait for short link data access.

use crate::domain::entities::{LinkPatch, NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteLinkRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new short link with a view count of zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the identifier is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: &str) -> Result<Option<ShortLink>, AppError>;

    /// Returns true if a link with this identifier exists.
    async fn exists(&self, id: &str) -> Result<bool, AppError>;

    /// Lists every link owned by `owner`, newest first.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<ShortLink>, AppError>;

    /// Applies a partial update. `None` fields are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches `id`.
    /// Returns [`AppError::Conflict`] if `patch.id` is already taken.
    async fn update(&self, id: &str, patch: LinkPatch) -> Result<ShortLink, AppError>;

    /// Deletes a link. Returns `Ok(false)` if nothing was deleted.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Atomically increments the view count and returns the target URL.
    ///
    /// Returns `Ok(None)` without touching any row when `id` is unknown.
    async fn record_view(&self, id: &str) -> Result<Option<String>, AppError>;
}
