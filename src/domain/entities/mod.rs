//! Core domain entities.
//!
//! - [`ShortLink`] - an identifier mapped to a target URL
//! - [`User`] - a registered account owning links
//!
//! Creation inputs live in separate structs (`NewShortLink`, `NewUser`,
//! `NewAccount`); partial updates use [`LinkPatch`].

pub mod link;
pub mod user;

pub use link::{LinkPatch, NewShortLink, ShortLink};
pub use user::{NewAccount, NewUser, User};
