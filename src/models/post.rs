//! Post model and per-post crawl status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-post crawl status, set by the post-content stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostCrawlStatus {
    Pending,
    Completed,
    Unavailable,
}

impl PostCrawlStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Unavailable => "unavailable",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "unavailable" => Some(Self::Unavailable),
            _ => None,
        }
    }
}

/// A single blog post.
///
/// Created with title/url only during the post-list stage and enriched with
/// content, category and date during the post-content stage. The identifier
/// is `{blog_id}_{log_no}` where `log_no` is the site-native post number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub blog_id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub post_url: Option<String>,
    pub post_date: Option<String>,
    pub comment_count: i64,
    pub sympathy_count: i64,
    pub crawl_status: PostCrawlStatus,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Build the composite post identifier.
    pub fn make_id(blog_id: &str, log_no: &str) -> String {
        format!("{}_{}", blog_id, log_no)
    }

    /// Extract the site-native log number from a composite post id.
    pub fn log_no(&self) -> &str {
        match self.id.split_once('_') {
            Some((_, log_no)) => log_no,
            None => &self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_id_split() {
        let post = Post {
            id: Post::make_id("myblog", "223456789"),
            blog_id: "myblog".to_string(),
            title: None,
            content: None,
            category: None,
            post_url: None,
            post_date: None,
            comment_count: 0,
            sympathy_count: 0,
            crawl_status: PostCrawlStatus::Pending,
            created_at: Utc::now(),
        };
        assert_eq!(post.id, "myblog_223456789");
        assert_eq!(post.log_no(), "223456789");
    }
}
