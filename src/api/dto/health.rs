//! DTOs for health check endpoint.

use serde::Serialize;

/// Overall service state reported by `GET /health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: StoreCheck,
}

/// Link store reachability, with the number of stored links when reachable.
#[derive(Debug, Serialize)]
pub struct StoreCheck {
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StoreCheck {
    pub fn reachable(links: i64) -> Self {
        Self {
            status: "ok",
            links: Some(links),
            message: Some(format!("Connected, {} links", links)),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            status: "error",
            links: None,
            message: Some("Database unavailable".to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.links.is_some()
    }
}
