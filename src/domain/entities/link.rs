//! Short link entity.

use chrono::{DateTime, Utc};

/// A short identifier mapped to a target URL and owned by one user.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ShortLink {
    pub id: String,
    pub title: Option<String>,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub view_count: i64,
    pub owner: String,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(
        id: String,
        title: Option<String>,
        target_url: String,
        created_at: DateTime<Utc>,
        view_count: i64,
        owner: String,
    ) -> Self {
        Self {
            id,
            title,
            target_url,
            created_at,
            view_count,
            owner,
        }
    }
}

/// Input data for inserting a new link. View count always starts at zero.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub id: String,
    pub title: Option<String>,
    pub target_url: String,
    pub owner: String,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged. `id` renames the link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub title: Option<String>,
    pub target_url: Option<String>,
    pub id: Option<String>,
}

impl LinkPatch {
    /// Drops empty strings so that they keep the previous value.
    ///
    /// A whitespace-only `id` is kept and left for back-half validation to reject.
    pub fn normalized(self) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        Self {
            title: non_blank(self.title),
            target_url: non_blank(self.target_url),
            id: self.id.filter(|v| !v.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.target_url.is_none() && self.id.is_none()
    }
}
