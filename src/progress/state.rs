//! Progress document schema and in-memory operations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::BlogStatus;

/// One of the five fixed crawl stages, in contract order.
///
/// Declaration order is the stage order; both the resume scan and the
/// serialized `steps_completed` map rely on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CrawlStep {
    BlogInfo,
    PostList,
    PostContent,
    Reactions,
    Comments,
}

impl CrawlStep {
    /// All five stages in fixed order.
    pub const ALL: [CrawlStep; 5] = [
        CrawlStep::BlogInfo,
        CrawlStep::PostList,
        CrawlStep::PostContent,
        CrawlStep::Reactions,
        CrawlStep::Comments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlogInfo => "blog_info",
            Self::PostList => "post_list",
            Self::PostContent => "post_content",
            Self::Reactions => "reactions",
            Self::Comments => "comments",
        }
    }

    /// Human-readable stage label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BlogInfo => "blog info",
            Self::PostList => "post list",
            Self::PostContent => "post content",
            Self::Reactions => "reactions",
            Self::Comments => "comments",
        }
    }
}

/// Per-stage progress status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Durable per-blog resume checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogProgress {
    pub blog_id: String,
    #[serde(default)]
    pub blog_name: Option<String>,
    #[serde(default = "default_status")]
    pub status: BlogStatus,
    #[serde(default)]
    pub total_posts: i64,
    #[serde(default)]
    pub current_post_index: i64,
    #[serde(default)]
    pub steps_completed: BTreeMap<CrawlStep, StepStatus>,
}

fn default_status() -> BlogStatus {
    BlogStatus::Pending
}

impl BlogProgress {
    /// A fresh record with every stage pending.
    pub fn new(blog_id: &str) -> Self {
        Self {
            blog_id: blog_id.to_string(),
            blog_name: None,
            status: BlogStatus::Pending,
            total_posts: 0,
            current_post_index: 0,
            steps_completed: CrawlStep::ALL
                .iter()
                .map(|s| (*s, StepStatus::Pending))
                .collect(),
        }
    }

    /// Status of one stage; a stage missing from the map counts as pending.
    pub fn step_status(&self, step: CrawlStep) -> StepStatus {
        self.steps_completed.get(&step).copied().unwrap_or_default()
    }

    /// The next stage a resumed run should execute.
    ///
    /// A half-finished (`in_progress`) stage wins over any pending one,
    /// even a pending stage earlier in the fixed order, because its marker
    /// means work was interrupted there. With no in-progress stage the
    /// first pending stage is next; all-completed yields None.
    pub fn next_incomplete_step(&self) -> Option<CrawlStep> {
        CrawlStep::ALL
            .iter()
            .copied()
            .find(|s| self.step_status(*s) == StepStatus::InProgress)
            .or_else(|| {
                CrawlStep::ALL
                    .iter()
                    .copied()
                    .find(|s| self.step_status(*s) == StepStatus::Pending)
            })
    }

    /// True when this record still has work left.
    pub fn is_incomplete(&self) -> bool {
        if self.status == BlogStatus::InProgress {
            return true;
        }
        CrawlStep::ALL.iter().any(|s| {
            matches!(
                self.step_status(*s),
                StepStatus::Pending | StepStatus::InProgress
            )
        })
    }
}

/// Partial update applied to a blog's progress record. Absent fields are
/// never cleared; the `(step, step_status)` pair touches exactly one stage.
#[derive(Debug, Clone, Default)]
pub struct BlogProgressUpdate {
    pub blog_name: Option<String>,
    pub status: Option<BlogStatus>,
    pub total_posts: Option<i64>,
    pub current_post_index: Option<i64>,
    pub step: Option<(CrawlStep, StepStatus)>,
}

impl BlogProgressUpdate {
    pub fn status(status: BlogStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn step(step: CrawlStep, step_status: StepStatus) -> Self {
        Self {
            step: Some((step, step_status)),
            ..Default::default()
        }
    }

    pub fn cursor(index: i64) -> Self {
        Self {
            current_post_index: Some(index),
            ..Default::default()
        }
    }
}

/// The whole progress document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub blogs: Vec<BlogProgress>,
}

impl ProgressState {
    /// Look up one blog's record.
    pub fn blog(&self, blog_id: &str) -> Option<&BlogProgress> {
        self.blogs.iter().find(|b| b.blog_id == blog_id)
    }

    /// Create or merge a blog's record.
    ///
    /// A new record starts with the default all-pending stage map and then
    /// has the update applied. Merging never clears fields the update does
    /// not mention, and a `(step, step_status)` pair leaves the other four
    /// stages untouched.
    pub fn upsert(&mut self, blog_id: &str, update: BlogProgressUpdate) {
        let index = match self.blogs.iter().position(|b| b.blog_id == blog_id) {
            Some(index) => index,
            None => {
                self.blogs.push(BlogProgress::new(blog_id));
                self.blogs.len() - 1
            }
        };
        let record = &mut self.blogs[index];

        if let Some(name) = update.blog_name {
            record.blog_name = Some(name);
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(total) = update.total_posts {
            record.total_posts = total;
        }
        if let Some(index) = update.current_post_index {
            record.current_post_index = index;
        }
        if let Some((step, step_status)) = update.step {
            record.steps_completed.insert(step, step_status);
        }
    }

    /// Remove a blog's record; removing an absent record is a no-op.
    pub fn remove(&mut self, blog_id: &str) {
        self.blogs.retain(|b| b.blog_id != blog_id);
    }

    /// True when any record still has work left. Records whose overall
    /// status is completed are scanned anyway; by invariant their stages
    /// are all completed, so they contribute nothing.
    pub fn has_incomplete_work(&self) -> bool {
        self.blogs.iter().any(|b| b.is_incomplete())
    }
}
