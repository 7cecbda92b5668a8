//! SQLite repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx
//! parameterized queries.
//!
//! - [`SqliteLinkRepository`] - Link storage, lookup and view counting
//! - [`SqliteUserRepository`] - User accounts

pub mod sqlite_link_repository;
pub mod sqlite_user_repository;

pub use sqlite_link_repository::SqliteLinkRepository;
pub use sqlite_user_repository::SqliteUserRepository;
