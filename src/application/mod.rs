//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! - [`services::link_service::LinkService`] - Link registry and redirect resolution
//! - [`services::auth_service::AuthService`] - Registration, login and bearer tokens

pub mod services;
