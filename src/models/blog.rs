//! Blog model and lifecycle status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a crawl target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Unavailable,
    Disabled,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unavailable => "unavailable",
            Self::Disabled => "disabled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "unavailable" => Some(Self::Unavailable),
            "disabled" => Some(Self::Disabled),
            _ => None,
        }
    }
}

/// A blog registered for crawling. One row per distinct crawl target; the
/// identifier is the site-native blog id derived from the source URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: String,
    pub name: String,
    pub author_name: Option<String>,
    pub url: String,
    pub post_count: i64,
    pub status: BlogStatus,
    pub created_at: DateTime<Utc>,
}

impl Blog {
    /// Create a new pending blog from its id and canonical URL.
    pub fn new(id: String, name: String, url: String) -> Self {
        Self {
            id,
            name,
            author_name: None,
            url,
            post_count: 0,
            status: BlogStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
