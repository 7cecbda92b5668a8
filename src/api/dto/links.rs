//! DTOs for short link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::CreateLink;
use crate::domain::entities::{LinkPatch, ShortLink, User};

/// Body of `POST /api/v1/urls/create`.
#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub title: Option<String>,

    /// Custom identifier; generated when absent or empty.
    pub back_half: Option<String>,

    #[serde(rename = "original_URL")]
    pub original_url: String,
}

impl From<CreateLinkRequest> for CreateLink {
    fn from(req: CreateLinkRequest) -> Self {
        CreateLink {
            title: req.title,
            target_url: req.original_url,
            back_half: req.back_half,
        }
    }
}

/// Body of `POST /api/v1/urls/update`.
#[derive(Debug, Deserialize)]
pub struct UpdateLinkRequest {
    /// Current identifier of the link to update.
    pub id: String,
    #[serde(default)]
    pub content: UpdateLinkContent,
}

/// Fields to change. Absent or empty values keep the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLinkContent {
    pub title: Option<String>,
    pub back_half: Option<String>,
    #[serde(rename = "original_URL")]
    pub original_url: Option<String>,
}

impl From<UpdateLinkContent> for LinkPatch {
    fn from(content: UpdateLinkContent) -> Self {
        LinkPatch {
            title: content.title,
            target_url: content.original_url,
            id: content.back_half,
        }
    }
}

/// Query string of `DELETE /api/v1/urls/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteLinkQuery {
    pub url_id: String,
}

/// JSON representation of a short link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: String,
    pub title: Option<String>,
    #[serde(rename = "original_URL")]
    pub original_url: String,
    pub short_url: String,
    pub creation_date: DateTime<Utc>,
    pub view_count: i64,
    pub owner: String,
}

impl LinkResponse {
    /// Renders `link` with its public URL built from `short_url`.
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            id: link.id,
            title: link.title,
            original_url: link.target_url,
            short_url,
            creation_date: link.created_at,
            view_count: link.view_count,
            owner: link.owner,
        }
    }
}

/// Public profile of a link owner. Never includes credentials.
#[derive(Debug, Serialize)]
pub struct OwnerSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for OwnerSummary {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Response of `GET /api/v1/urls/{id}/info`.
#[derive(Debug, Serialize)]
pub struct LinkInfoResponse {
    pub link: LinkResponse,
    pub owner: Option<OwnerSummary>,
}

/// Plain acknowledgement message.
#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: String,
}
