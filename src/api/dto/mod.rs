//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization; registration
//! input is checked with validator.

pub mod auth;
pub mod health;
pub mod links;
