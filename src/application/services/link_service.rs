//! Short link registry and redirect resolution.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{LinkPatch, NewShortLink, ShortLink};
use crate::domain::ownership::authorize_owner;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, normalize_target_url, validate_back_half};

/// Default bound on identifier allocation attempts.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Client input for a new short link.
#[derive(Debug, Clone)]
pub struct CreateLink {
    pub title: Option<String>,
    pub target_url: String,
    /// Custom identifier. `None` or empty allocates a random one.
    pub back_half: Option<String>,
}

/// Service for creating, mutating and resolving short links.
///
/// Every mutation is gated by [`authorize_owner`]. Identifiers are either
/// user-chosen back-halves or allocated randomly with bounded retries.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    max_attempts: usize,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service with the default allocation bound.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self {
            link_repository,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the number of allocation attempts (minimum 1).
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Creates a short link owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the target URL or back-half is invalid.
    /// Returns [`AppError::Conflict`] if the back-half is already taken.
    /// Returns [`AppError::AllocationExhausted`] if no free identifier was found.
    pub async fn create_link(&self, owner: &str, input: CreateLink) -> Result<ShortLink, AppError> {
        let target_url = normalize_target_url(&input.target_url)?;

        let title = input.title.filter(|t| !t.trim().is_empty());
        let back_half = input.back_half.filter(|b| !b.is_empty());

        let link = match back_half {
            Some(back_half) => {
                validate_back_half(&back_half)?;

                if self.link_repository.exists(&back_half).await? {
                    return Err(AppError::conflict(
                        "Short URL already exists",
                        json!({ "id": back_half }),
                    ));
                }

                self.link_repository
                    .create(NewShortLink {
                        id: back_half,
                        title,
                        target_url,
                        owner: owner.to_string(),
                    })
                    .await?
            }
            None => {
                self.create_with_allocated_id(owner, title, target_url)
                    .await?
            }
        };

        metrics::counter!("shortlink_links_created_total").increment(1);
        info!(id = %link.id, owner, "Short URL created");

        Ok(link)
    }

    /// Draws candidates until one is not in use at the time of the check.
    ///
    /// Every draw counts against `attempts`, which callers share across
    /// insert retries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AllocationExhausted`] once `max_attempts` draws
    /// have been spent.
    async fn allocate_identifier(&self, attempts: &mut usize) -> Result<String, AppError> {
        while *attempts < self.max_attempts {
            *attempts += 1;
            let candidate = generate_code();

            if !self.link_repository.exists(&candidate).await? {
                return Ok(candidate);
            }

            debug!(attempt = *attempts, "Identifier collision");
        }

        Err(self.exhausted())
    }

    /// Inserts with a freshly allocated identifier.
    ///
    /// A concurrent request may claim the same identifier between the
    /// existence check and the insert; the unique constraint then reports a
    /// conflict and another identifier is drawn from the same attempt budget.
    async fn create_with_allocated_id(
        &self,
        owner: &str,
        title: Option<String>,
        target_url: String,
    ) -> Result<ShortLink, AppError> {
        let mut attempts = 0;

        loop {
            let id = self.allocate_identifier(&mut attempts).await?;

            let new_link = NewShortLink {
                id,
                title: title.clone(),
                target_url: target_url.clone(),
                owner: owner.to_string(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { .. }) => {
                    warn!(attempt = attempts, "Identifier claimed concurrently, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn exhausted(&self) -> AppError {
        warn!(max_attempts = self.max_attempts, "Identifier allocation exhausted");
        AppError::allocation_exhausted(
            "Failed to allocate a unique short URL",
            json!({ "attempts": self.max_attempts }),
        )
    }

    /// Retrieves a link by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches.
    pub async fn get_link(&self, id: &str) -> Result<ShortLink, AppError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "id": id })))
    }

    /// Lists the links owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user owns no links.
    pub async fn list_links(&self, owner: &str) -> Result<Vec<ShortLink>, AppError> {
        let links = self.link_repository.list_by_owner(owner).await?;

        if links.is_empty() {
            return Err(AppError::not_found(
                "No short URLs found",
                json!({ "owner": owner }),
            ));
        }

        Ok(links)
    }

    /// Deletes a link owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link doesn't exist.
    /// Returns [`AppError::Forbidden`] if `owner` doesn't own it.
    pub async fn delete_link(&self, owner: &str, id: &str) -> Result<(), AppError> {
        let link = self.get_link(id).await?;
        authorize_owner(owner, &link.owner)?;

        if !self.link_repository.delete(id).await? {
            return Err(AppError::not_found(
                "Short URL not found",
                json!({ "id": id }),
            ));
        }

        info!(id, owner, "Short URL deleted");
        Ok(())
    }

    /// Applies a partial update to a link owned by `owner`.
    ///
    /// Empty fields keep their previous value. A new back-half must be valid
    /// and not used by another link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`], [`AppError::Forbidden`],
    /// [`AppError::Validation`] or [`AppError::Conflict`].
    pub async fn update_link(
        &self,
        owner: &str,
        id: &str,
        patch: LinkPatch,
    ) -> Result<ShortLink, AppError> {
        let link = self.get_link(id).await?;
        authorize_owner(owner, &link.owner)?;

        let mut patch = patch.normalized();

        if let Some(new_id) = patch.id.as_deref() {
            validate_back_half(new_id)?;

            if new_id == id {
                patch.id = None;
            } else if self.link_repository.exists(new_id).await? {
                return Err(AppError::conflict(
                    "Short URL already exists",
                    json!({ "id": new_id }),
                ));
            }
        }

        if let Some(target_url) = patch.target_url.take() {
            patch.target_url = Some(normalize_target_url(&target_url)?);
        }

        if patch.is_empty() {
            return Ok(link);
        }

        let updated = self.link_repository.update(id, patch).await?;
        info!(id, new_id = %updated.id, owner, "Short URL updated");

        Ok(updated)
    }

    /// Resolves an identifier for redirection and counts the view.
    ///
    /// Returns `Ok(None)` for unknown identifiers; nothing is modified then.
    pub async fn resolve(&self, id: &str) -> Result<Option<String>, AppError> {
        let target = self.link_repository.record_view(id).await?;

        match target {
            Some(_) => metrics::counter!("shortlink_redirects_total").increment(1),
            None => {
                metrics::counter!("shortlink_redirect_misses_total").increment(1);
                debug!(id, "Short URL miss");
            }
        }

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;

    fn test_link(id: &str, owner: &str) -> ShortLink {
        ShortLink::new(
            id.to_string(),
            Some("Blog".to_string()),
            "https://example.com".to_string(),
            Utc::now(),
            0,
            owner.to_string(),
        )
    }

    fn link_from(new_link: NewShortLink) -> ShortLink {
        ShortLink::new(
            new_link.id,
            new_link.title,
            new_link.target_url,
            Utc::now(),
            0,
            new_link.owner,
        )
    }

    fn draft(back_half: Option<&str>) -> CreateLink {
        CreateLink {
            title: Some("Blog".to_string()),
            target_url: "https://example.com".to_string(),
            back_half: back_half.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_link_generates_identifier() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().times(1).returning(|_| Ok(false));
        repo.expect_create()
            .withf(|l| l.id.len() == 10 && l.owner == "alice" && l.title.as_deref() == Some("Blog"))
            .times(1)
            .returning(|l| Ok(link_from(l)));

        let service = LinkService::new(Arc::new(repo));
        let link = service.create_link("alice", draft(None)).await.unwrap();

        assert_eq!(link.id.len(), 10);
        assert!(link.id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(link.target_url, "https://example.com/");
        assert_eq!(link.view_count, 0);
    }

    #[tokio::test]
    async fn test_create_link_empty_back_half_generates_identifier() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().times(1).returning(|_| Ok(false));
        repo.expect_create()
            .times(1)
            .returning(|l| Ok(link_from(l)));

        let service = LinkService::new(Arc::new(repo));
        let link = service.create_link("alice", draft(Some(""))).await.unwrap();

        assert_eq!(link.id.len(), 10);
    }

    #[tokio::test]
    async fn test_create_link_with_back_half() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists()
            .withf(|id| id == "mylink")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_create()
            .withf(|l| l.id == "mylink")
            .times(1)
            .returning(|l| Ok(link_from(l)));

        let service = LinkService::new(Arc::new(repo));
        let link = service
            .create_link("alice", draft(Some("mylink")))
            .await
            .unwrap();

        assert_eq!(link.id, "mylink");
    }

    #[tokio::test]
    async fn test_create_link_invalid_back_half() {
        let repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(repo));

        let err = service
            .create_link("alice", draft(Some("ab cd")))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_link_back_half_conflict() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().times(1).returning(|_| Ok(true));
        repo.expect_create().times(0);

        let service = LinkService::new(Arc::new(repo));
        let err = service
            .create_link("alice", draft(Some("taken")))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_link_invalid_target_url() {
        let repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(repo));

        let input = CreateLink {
            title: None,
            target_url: "not-a-url".to_string(),
            back_half: None,
        };
        let err = service.create_link("alice", input).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_allocation_exhausted_after_max_attempts() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().times(3).returning(|_| Ok(true));
        repo.expect_create().times(0);

        let service = LinkService::new(Arc::new(repo)).with_max_attempts(3);
        let err = service.create_link("alice", draft(None)).await.unwrap_err();

        assert!(matches!(err, AppError::AllocationExhausted { .. }));
    }

    #[tokio::test]
    async fn test_insert_conflicts_share_the_attempt_budget() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().times(3).returning(|_| Ok(false));
        repo.expect_create()
            .times(3)
            .returning(|l| Err(AppError::conflict("taken", json!({ "id": l.id }))));

        let service = LinkService::new(Arc::new(repo)).with_max_attempts(3);
        let err = service.create_link("alice", draft(None)).await.unwrap_err();

        assert!(matches!(err, AppError::AllocationExhausted { .. }));
    }

    #[tokio::test]
    async fn test_create_link_stores_normalized_target() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_create()
            .withf(|l| l.target_url == "https://example.com/ab")
            .times(1)
            .returning(|l| Ok(link_from(l)));

        let service = LinkService::new(Arc::new(repo));
        let input = CreateLink {
            title: None,
            target_url: "https://example.com/a\nb".to_string(),
            back_half: None,
        };
        let link = service.create_link("alice", input).await.unwrap();

        assert_eq!(link.target_url, "https://example.com/ab");
    }

    #[tokio::test]
    async fn test_insert_conflict_is_retried() {
        let mut repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();

        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|l| Err(AppError::conflict("taken", json!({ "id": l.id }))));
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|l| Ok(link_from(l)));

        let service = LinkService::new(Arc::new(repo));
        let link = service.create_link("alice", draft(None)).await.unwrap();

        assert_eq!(link.id.len(), 10);
    }

    #[tokio::test]
    async fn test_insert_internal_error_is_not_retried() {
        let mut repo = MockLinkRepository::new();

        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = LinkService::new(Arc::new(repo));
        let err = service.create_link("alice", draft(None)).await.unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(repo));
        let err = service.get_link("missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_links_empty_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_by_owner().returning(|_| Ok(vec![]));

        let service = LinkService::new(Arc::new(repo));
        let err = service.list_links("alice").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_links_returns_owned() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_by_owner()
            .withf(|owner| owner == "alice")
            .returning(|_| Ok(vec![test_link("one", "alice"), test_link("two", "alice")]));

        let service = LinkService::new(Arc::new(repo));
        let links = service.list_links("alice").await.unwrap();

        assert_eq!(links.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_link_by_owner() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_link(id, "alice"))));
        repo.expect_delete().times(1).returning(|_| Ok(true));

        let service = LinkService::new(Arc::new(repo));
        assert!(service.delete_link("alice", "mylink").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_link_by_non_owner_is_forbidden() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_link(id, "alice"))));
        repo.expect_delete().times(0);

        let service = LinkService::new(Arc::new(repo));
        let err = service.delete_link("bob", "mylink").await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_delete_link_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_delete().times(0);

        let service = LinkService::new(Arc::new(repo));
        let err = service.delete_link("alice", "ghost").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_link_empty_patch_keeps_record() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_link(id, "alice"))));
        repo.expect_update().times(0);

        let service = LinkService::new(Arc::new(repo));
        let patch = LinkPatch {
            title: Some(String::new()),
            target_url: Some(String::new()),
            id: Some(String::new()),
        };
        let link = service.update_link("alice", "mylink", patch).await.unwrap();

        assert_eq!(link.id, "mylink");
        assert_eq!(link.title.as_deref(), Some("Blog"));
    }

    #[tokio::test]
    async fn test_update_link_forbidden_for_non_owner() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_link(id, "alice"))));
        repo.expect_update().times(0);

        let service = LinkService::new(Arc::new(repo));
        let patch = LinkPatch {
            title: Some("Hijacked".to_string()),
            ..Default::default()
        };
        let err = service.update_link("bob", "mylink", patch).await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_update_link_invalid_back_half() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_link(id, "alice"))));

        let service = LinkService::new(Arc::new(repo));
        let patch = LinkPatch {
            id: Some("no spaces".to_string()),
            ..Default::default()
        };
        let err = service
            .update_link("alice", "mylink", patch)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_link_blank_back_half_rejected() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_link(id, "alice"))));
        repo.expect_update().times(0);

        let service = LinkService::new(Arc::new(repo));
        let patch = LinkPatch {
            id: Some("   ".to_string()),
            ..Default::default()
        };
        let err = service
            .update_link("alice", "mylink", patch)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_link_back_half_taken() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_link(id, "alice"))));
        repo.expect_exists()
            .withf(|id| id == "other")
            .returning(|_| Ok(true));
        repo.expect_update().times(0);

        let service = LinkService::new(Arc::new(repo));
        let patch = LinkPatch {
            id: Some("other".to_string()),
            ..Default::default()
        };
        let err = service
            .update_link("alice", "mylink", patch)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_link_rename_and_retarget() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_link(id, "alice"))));
        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_update()
            .withf(|id, patch| {
                id == "mylink"
                    && patch.id.as_deref() == Some("renamed")
                    && patch.target_url.as_deref() == Some("https://new.example.com/")
                    && patch.title.is_none()
            })
            .times(1)
            .returning(|_, patch| {
                let mut link = test_link("renamed", "alice");
                link.target_url = patch.target_url.unwrap();
                Ok(link)
            });

        let service = LinkService::new(Arc::new(repo));
        let patch = LinkPatch {
            title: None,
            target_url: Some("https://new.example.com".to_string()),
            id: Some("renamed".to_string()),
        };
        let link = service.update_link("alice", "mylink", patch).await.unwrap();

        assert_eq!(link.id, "renamed");
        assert_eq!(link.target_url, "https://new.example.com/");
        assert_eq!(link.title.as_deref(), Some("Blog"));
    }

    #[tokio::test]
    async fn test_resolve_hit_and_miss() {
        let mut repo = MockLinkRepository::new();
        repo.expect_record_view()
            .withf(|id| id == "known")
            .returning(|_| Ok(Some("https://example.com".to_string())));
        repo.expect_record_view()
            .withf(|id| id == "unknown")
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(repo));

        assert_eq!(
            service.resolve("known").await.unwrap().as_deref(),
            Some("https://example.com")
        );
        assert!(service.resolve("unknown").await.unwrap().is_none());
    }
}
