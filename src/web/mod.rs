//! Server-rendered HTML pages.
//!
//! Uses Askama templates from `templates/`.
//!
//! # Modules
//!
//! - [`pages`] - Page templates shown to browsers following short links

pub mod pages;
