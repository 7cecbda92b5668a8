//! SQLite implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{LinkPatch, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, title, target_url, created_at, view_count, owner";

/// SQLite repository for link storage and retrieval.
///
/// Every operation is a single parameterized statement.
pub struct SqliteLinkRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

/// Maps a unique violation on `short_links.id` to a conflict naming the identifier.
fn map_id_conflict(e: sqlx::Error, id: &str) -> AppError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            AppError::conflict("Short URL already exists", json!({ "id": id }))
        }
        _ => e.into(),
    }
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let query = format!(
            r#"
            INSERT INTO short_links (id, title, target_url, created_at, view_count, owner)
            VALUES (?1, ?2, ?3, ?4, 0, ?5)
            RETURNING {LINK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, ShortLink>(&query)
            .bind(&new_link.id)
            .bind(&new_link.title)
            .bind(&new_link.target_url)
            .bind(Utc::now())
            .bind(&new_link.owner)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| map_id_conflict(e, &new_link.id))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ShortLink>, AppError> {
        let query = format!("SELECT {LINK_COLUMNS} FROM short_links WHERE id = ?1");

        let link = sqlx::query_as::<_, ShortLink>(&query)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(link)
    }

    async fn exists(&self, id: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links WHERE id = ?1")
            .bind(id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count > 0)
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<ShortLink>, AppError> {
        let query = format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM short_links
            WHERE owner = ?1
            ORDER BY created_at DESC, rowid DESC
            "#
        );

        let links = sqlx::query_as::<_, ShortLink>(&query)
            .bind(owner)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(links)
    }

    async fn update(&self, id: &str, patch: LinkPatch) -> Result<ShortLink, AppError> {
        let query = format!(
            r#"
            UPDATE short_links
            SET title      = COALESCE(?1, title),
                target_url = COALESCE(?2, target_url),
                id         = COALESCE(?3, id)
            WHERE id = ?4
            RETURNING {LINK_COLUMNS}
            "#
        );

        let new_id = patch.id.clone().unwrap_or_else(|| id.to_string());

        sqlx::query_as::<_, ShortLink>(&query)
            .bind(patch.title)
            .bind(patch.target_url)
            .bind(patch.id)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(|e| map_id_conflict(e, &new_id))?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "id": id })))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_links WHERE id = ?1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_view(&self, id: &str) -> Result<Option<String>, AppError> {
        let target = sqlx::query_scalar::<_, String>(
            r#"
            UPDATE short_links
            SET view_count = view_count + 1
            WHERE id = ?1
            RETURNING target_url
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(target)
    }
}
