//! Reaction counts attached to posts.

use serde::{Deserialize, Serialize};

/// A reaction-type count for one post. Unique per (post, type); re-crawling
/// replaces the count rather than appending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub post_id: String,
    pub reaction_type: String,
    pub count: i64,
}
