//! End-to-end crawl session: interrupt mid-stage, then resume to completion.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use blogseek::crawl::{BlogSelection, CrawlSession};
use blogseek::models::{Blog, BlogStatus, PostCrawlStatus};
use blogseek::progress::{CrawlStep, ProgressStore, StepStatus};
use blogseek::repository::DbContext;
use blogseek::scrapers::{
    BlogInfo, BlogSite, FetchedComment, PostContent, PostListItem, ReactionCount, ReactionSummary,
};

/// Serves a three-post blog and records every fetch. Optionally raises the
/// stop flag after a given number of post-content fetches, imitating a user
/// hitting stop mid-stage.
struct FixtureSite {
    calls: Mutex<Vec<String>>,
    content_fetches: AtomicUsize,
    stop_after: Option<(usize, Arc<AtomicBool>)>,
}

impl FixtureSite {
    fn new(stop_after: Option<(usize, Arc<AtomicBool>)>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            content_fetches: AtomicUsize::new(0),
            stop_after,
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlogSite for FixtureSite {
    async fn fetch_blog_info(&self, blog_id: &str) -> Option<BlogInfo> {
        self.record("blog_info".to_string());
        Some(BlogInfo {
            id: blog_id.to_string(),
            blog_name: "Garden Log".to_string(),
            author_name: Some("gardener".to_string()),
            url: format!("https://blog.naver.com/{}", blog_id),
            post_count: 3,
        })
    }

    async fn fetch_post_list(&self, blog_id: &str) -> Vec<PostListItem> {
        self.record("post_list".to_string());
        (1..=3)
            .map(|n| PostListItem {
                id: format!("{}_{}", blog_id, n),
                blog_id: blog_id.to_string(),
                log_no: n.to_string(),
                title: Some(format!("entry {}", n)),
                post_url: format!("https://blog.naver.com/{}/{}", blog_id, n),
            })
            .collect()
    }

    async fn fetch_post_content(&self, _blog_id: &str, log_no: &str) -> Option<PostContent> {
        self.record(format!("content:{}", log_no));
        let fetched = self.content_fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, flag)) = &self.stop_after {
            if fetched >= *after {
                flag.store(true, Ordering::Relaxed);
            }
        }
        Some(PostContent {
            title: Some(format!("entry {}", log_no)),
            content: Some("text".to_string()),
            category: Some("garden".to_string()),
            post_date: Some("2024. 3. 2.".to_string()),
        })
    }

    async fn fetch_reactions(&self, _blog_id: &str, log_no: &str) -> ReactionSummary {
        self.record(format!("reactions:{}", log_no));
        ReactionSummary {
            total_count: 7,
            reactions: vec![ReactionCount {
                reaction_type: "좋아요".to_string(),
                count: 7,
            }],
        }
    }

    async fn fetch_comments(&self, blog_id: &str, log_no: &str) -> Vec<FetchedComment> {
        self.record(format!("comments:{}", log_no));
        let post_id = format!("{}_{}", blog_id, log_no);
        vec![
            FetchedComment {
                id: format!("{}_c1", post_id),
                post_id: post_id.clone(),
                parent_id: None,
                is_reply: false,
                author: Some("reader".to_string()),
                content: Some("nice one".to_string()),
                like_count: 1,
                written_at: Some("2024.03.02. 15:01".to_string()),
            },
            FetchedComment {
                id: format!("{}_c2", post_id),
                post_id: post_id.clone(),
                parent_id: Some(format!("{}_c1", post_id)),
                is_reply: true,
                author: Some("gardener".to_string()),
                content: Some("thanks".to_string()),
                like_count: 0,
                written_at: Some("2024.03.02. 16:20".to_string()),
            },
        ]
    }
}

async fn fixture() -> (DbContext, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let ctx = DbContext::new(&dir.path().join("blogseek.db"));
    ctx.init_schema().await.unwrap();
    ctx.blogs()
        .add(&Blog::new(
            "b1".to_string(),
            "b1".to_string(),
            "https://blog.naver.com/b1".to_string(),
        ))
        .await
        .unwrap();
    (ctx, dir)
}

#[tokio::test]
async fn interrupted_session_resumes_where_it_stopped() {
    let (ctx, dir) = fixture().await;
    let progress_path = dir.path().join("crawl_progress.json");

    // First run: stop is requested while the first post's content is being
    // fetched; that post completes, then the session winds down.
    let flag = Arc::new(AtomicBool::new(false));
    let site = FixtureSite::new(Some((1, Arc::clone(&flag))));
    let session = CrawlSession::new(ctx.clone(), ProgressStore::new(&progress_path), site)
        .with_stop_flag(flag);

    let report = session.run(BlogSelection::Fresh).await.unwrap();
    assert_eq!(report.completed, 0);
    assert_eq!(report.interrupted, 1);

    let state = ProgressStore::new(&progress_path).load();
    let record = state.blog("b1").unwrap();
    assert_eq!(record.status, BlogStatus::InProgress);
    assert_eq!(record.current_post_index, 1);
    assert_eq!(record.step_status(CrawlStep::BlogInfo), StepStatus::Completed);
    assert_eq!(record.step_status(CrawlStep::PostList), StepStatus::Completed);
    assert_eq!(
        record.step_status(CrawlStep::PostContent),
        StepStatus::InProgress
    );
    assert!(state.has_incomplete_work());

    // The blog row reflects the interruption too
    let blog = ctx.blogs().get("b1").await.unwrap().unwrap();
    assert_eq!(blog.status, BlogStatus::InProgress);
    assert_eq!(blog.name, "Garden Log");

    // Second run: resume. Completed stages are skipped and the content
    // stage picks up at the persisted cursor.
    let site = FixtureSite::new(None);
    let session = CrawlSession::new(ctx.clone(), ProgressStore::new(&progress_path), site);

    let report = session.run(BlogSelection::Resume).await.unwrap();
    assert_eq!(report.completed, 1);

    let calls = session_calls(&session);
    assert!(!calls.contains(&"blog_info".to_string()));
    assert!(!calls.contains(&"post_list".to_string()));
    assert!(!calls.contains(&"content:1".to_string()));
    assert!(calls.contains(&"content:2".to_string()));
    assert!(calls.contains(&"content:3".to_string()));

    // Everything landed: posts enriched, reactions upserted, comments stored
    let posts = ctx.posts().get_by_blog("b1").await.unwrap();
    assert_eq!(posts.len(), 3);
    for post in &posts {
        assert_eq!(post.crawl_status, PostCrawlStatus::Completed);
        assert_eq!(post.sympathy_count, 7);
        assert_eq!(post.comment_count, 2);
        assert_eq!(post.category.as_deref(), Some("garden"));
    }
    let comments = ctx.comments().get_by_post("b1_2", true).await.unwrap();
    assert_eq!(comments.len(), 2);
    let reply = comments.iter().find(|c| c.thread.is_reply()).unwrap();
    assert_eq!(reply.thread.parent_id(), Some("b1_2_c1"));

    let state = ProgressStore::new(&progress_path).load();
    assert!(!state.has_incomplete_work());
    assert_eq!(state.blog("b1").unwrap().status, BlogStatus::Completed);
}

#[tokio::test]
async fn delete_blog_clears_everything_after_a_crawl() {
    let (ctx, dir) = fixture().await;
    let progress_path = dir.path().join("crawl_progress.json");

    let session = CrawlSession::new(
        ctx.clone(),
        ProgressStore::new(&progress_path),
        FixtureSite::new(None),
    );
    let report = session.run(BlogSelection::Fresh).await.unwrap();
    assert_eq!(report.completed, 1);

    ctx.blogs().delete("b1").await.unwrap();

    assert!(ctx.blogs().get("b1").await.unwrap().is_none());
    assert!(ctx.posts().get_by_blog("b1").await.unwrap().is_empty());
    assert!(ctx.comments().get_by_post("b1_1", true).await.unwrap().is_empty());
    assert!(ctx.reactions().get_by_post("b1_1").await.unwrap().is_empty());
    assert!(ctx.progress().get("b1").await.unwrap().is_none());
}

fn session_calls(session: &CrawlSession<FixtureSite>) -> Vec<String> {
    session.site().calls()
}
