//! Data models for blogseek.

mod blog;
mod comment;
mod post;
mod reaction;

pub use blog::{Blog, BlogStatus};
pub use comment::{Comment, CommentThread};
pub use post::{Post, PostCrawlStatus};
pub use reaction::Reaction;
