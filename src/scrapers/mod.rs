//! Per-stage fetchers for the target blog platform.
//!
//! Everything behind [`BlogSite`] treats failure as absence: a network
//! error, a non-2xx status, or unparseable markup yields `None` or an empty
//! collection, never an `Err`. The orchestrator decides what absence means
//! for each stage.

pub mod http_client;
pub mod naver;

pub use http_client::HttpClient;
pub use naver::NaverBlogClient;

use async_trait::async_trait;

/// Blog-level metadata as scraped from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogInfo {
    pub id: String,
    pub blog_name: String,
    pub author_name: Option<String>,
    pub url: String,
    pub post_count: i64,
}

/// One entry from the paginated post list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListItem {
    /// Composite identifier `{blog_id}_{log_no}`.
    pub id: String,
    pub blog_id: String,
    pub log_no: String,
    pub title: Option<String>,
    pub post_url: String,
}

/// Scraped body of a single post. All fields are best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostContent {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub post_date: Option<String>,
}

/// One reaction type with a non-zero count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCount {
    pub reaction_type: String,
    pub count: i64,
}

/// All reactions on a post. An unreachable post reports zero reactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionSummary {
    pub total_count: i64,
    pub reactions: Vec<ReactionCount>,
}

/// One scraped comment, before conversion to the stored model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedComment {
    /// Composite identifier `{post_id}_c{n}`.
    pub id: String,
    pub post_id: String,
    /// Identifier of the comment this replies to, when attributable.
    pub parent_id: Option<String>,
    pub is_reply: bool,
    pub author: Option<String>,
    pub content: Option<String>,
    pub like_count: i64,
    pub written_at: Option<String>,
}

/// The seam between the orchestrator and a concrete blog platform.
///
/// Implementations own their HTTP resources for the duration of one crawl
/// session and are dropped when the session ends.
#[async_trait]
pub trait BlogSite: Send + Sync {
    /// Blog metadata, or None when the blog is unreachable.
    async fn fetch_blog_info(&self, blog_id: &str) -> Option<BlogInfo>;

    /// Every post the platform lists for the blog. Empty on failure.
    async fn fetch_post_list(&self, blog_id: &str) -> Vec<PostListItem>;

    /// Full content of one post, or None when it cannot be fetched.
    async fn fetch_post_content(&self, blog_id: &str, log_no: &str) -> Option<PostContent>;

    /// Reactions on one post. Empty summary on failure.
    async fn fetch_reactions(&self, blog_id: &str, log_no: &str) -> ReactionSummary;

    /// Comments on one post. Empty on failure.
    async fn fetch_comments(&self, blog_id: &str, log_no: &str) -> Vec<FetchedComment>;
}
