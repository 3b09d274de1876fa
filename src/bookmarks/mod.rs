//! Bookmarks Module
//!
//! CRUD over a single `bookmarks` table: typed request payloads, write-time
//! validation, libsql persistence and the axum routes tying them together.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookmark_api::bookmarks;
//!
//! let app = Router::new()
//!     .nest("/api/bookmarks", bookmarks::routes())
//!     .with_state(app_state);
//! ```

mod handler;
mod payload;
mod routes;
mod store;
mod validation;

pub use handler::sanitize_bookmark;
pub use payload::BookmarkPayload;
pub use routes::routes;
pub use store::{BookmarkStore, Bookmarks};
pub use validation::{
    Field, MAX_RATING, MIN_RATING, ValidationError, require_at_least_one_updatable_field,
    require_fields, validate_changes, validate_new, validate_rating, validate_url,
};

/// Schema migrations for the bookmarks table, applied by [`crate::db::Database`] at startup.
pub fn migrations() -> &'static [(&'static str, &'static str)] {
    &[(
        "bookmarks_001_schema.sql",
        include_str!("migrations/001_schema.sql"),
    )]
}
