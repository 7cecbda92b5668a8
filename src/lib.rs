//! # Shortlink
//!
//! A URL shortening service with per-user links, view counts and QR codes,
//! built with Axum and SQLite.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Core entities, ownership rule and repository traits
//! - **Application Layer** ([`application`]) - Link lifecycle and credential services
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite persistence
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//! - **Web Layer** ([`web`]) - HTML pages shown on the redirect route
//!
//! ## Features
//!
//! - Random or custom short identifiers with bounded collision retries
//! - Atomic view counting on redirect
//! - JWT bearer or cookie authentication, owner-only mutation
//! - QR code rendering
//! - Rate limiting and observability
//!
//! ## Quick Start
//!
//! ```bash
//! # Set required environment variables
//! export SECRET_JWT_KEY="change-me"
//! export DATABASE_URL="sqlite://shorturls.db"  # Optional
//!
//! # Start the service (migrations run on startup)
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AuthService, CreateLink, LinkService};
    pub use crate::domain::entities::{LinkPatch, NewShortLink, ShortLink, User};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
