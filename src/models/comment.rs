//! Comment model with the two-level thread structure.

use serde::{Deserialize, Serialize};

/// Position of a comment in its thread.
///
/// The domain never nests beyond one level: a comment is either top-level or
/// a direct reply to a top-level comment, so this is a sum type rather than
/// a general tree. A reply's parent reference is nullable because parent
/// attribution during scraping is heuristic and can fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommentThread {
    TopLevel,
    Reply { parent_id: Option<String> },
}

impl CommentThread {
    pub fn is_reply(&self) -> bool {
        matches!(self, Self::Reply { .. })
    }

    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Self::TopLevel => None,
            Self::Reply { parent_id } => parent_id.as_deref(),
        }
    }

    /// Reconstruct from the stored (is_reply, parent_id) pair.
    pub fn from_parts(is_reply: bool, parent_id: Option<String>) -> Self {
        if is_reply {
            Self::Reply { parent_id }
        } else {
            Self::TopLevel
        }
    }
}

/// A single comment captured from a post.
///
/// Comment content is treated as immutable history: once captured it is
/// never overwritten, unlike reaction counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub thread: CommentThread,
    pub author: Option<String>,
    pub content: Option<String>,
    pub like_count: i64,
    pub written_at: Option<String>,
}

impl Comment {
    /// Build a comment identifier from the post id and site-native number.
    pub fn make_id(post_id: &str, comment_no: &str) -> String {
        format!("{}_c{}", post_id, comment_no)
    }
}
