//! Repository layer for database persistence.
//!
//! All database access uses Diesel ORM with compile-time query checking over
//! SQLite. The entity store is deliberately forgiving at its boundary:
//! duplicate-identifier inserts surface as booleans/counts, never as errors.

pub mod blog;
pub mod comment;
pub mod context;
pub mod pool;
pub mod post;
pub mod progress;
pub mod reaction;
pub mod records;
pub mod util;

pub use blog::{BlogRepository, BlogStats};
pub use comment::CommentRepository;
pub use context::DbContext;
pub use pool::{AsyncSqlitePool, DieselError};
pub use post::PostRepository;
pub use progress::ProgressRepository;
pub use reaction::ReactionRepository;

use chrono::{DateTime, Utc};

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}
