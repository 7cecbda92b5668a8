//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod links;
pub mod qr;
pub mod redirect;
pub mod users;

pub use health::health_handler;
pub use links::{
    create_link_handler, delete_link_handler, link_info_handler, list_links_handler,
    update_link_handler,
};
pub use qr::qr_handler;
pub use redirect::redirect_handler;
pub use users::{login_handler, register_handler};
