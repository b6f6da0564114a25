//! The crawl session state machine.
//!
//! One session drives any number of blogs through the five fixed stages,
//! strictly sequentially: one blog, one stage, one post at a time. The JSON
//! progress document is written after every state change so a crash at any
//! point leaves an exact resume marker; the relational progress mirror is
//! updated best-effort alongside it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{CrawlError, CrawlEvent};
use crate::models::{Blog, BlogStatus, Comment, CommentThread, PostCrawlStatus, Reaction};
use crate::progress::{BlogProgressUpdate, CrawlStep, ProgressState, ProgressStore, StepStatus};
use crate::repository::post::PostSeed;
use crate::repository::DbContext;
use crate::scrapers::BlogSite;

/// Which blogs a run operates on.
#[derive(Debug, Clone)]
pub enum BlogSelection {
    /// The given blog ids, in order.
    Explicit(Vec<String>),
    /// Every blog whose status is pending or in_progress.
    Fresh,
    /// Exactly the blogs whose progress record shows in_progress; completed
    /// stages are skipped.
    Resume,
}

/// Outcome counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Blogs where every stage finished.
    pub completed: usize,
    /// Blogs left in_progress by the stop flag or a failed stage.
    pub interrupted: usize,
    /// Blogs aborted by a storage error.
    pub failed: usize,
}

/// A single crawl run over a set of blogs.
pub struct CrawlSession<S: BlogSite> {
    db: DbContext,
    store: ProgressStore,
    site: S,
    stop: Arc<AtomicBool>,
    events: Option<mpsc::UnboundedSender<CrawlEvent>>,
}

impl<S: BlogSite> CrawlSession<S> {
    pub fn new(db: DbContext, store: ProgressStore, site: S) -> Self {
        Self {
            db,
            store,
            site,
            stop: Arc::new(AtomicBool::new(false)),
            events: None,
        }
    }

    /// Attach an observation channel.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<CrawlEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Share an externally owned stop flag instead of the session's own.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Handle for requesting a graceful stop. Polled between units of work;
    /// the in-flight request always completes.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// The site implementation this session drives.
    pub fn site(&self) -> &S {
        &self.site
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    fn log(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.emit(CrawlEvent::Log(message));
    }

    /// Run the session. Storage errors are caught per blog: the failing
    /// blog is logged and abandoned with its progress markers exactly as
    /// they were, and the session moves to the next blog.
    pub async fn run(&self, selection: BlogSelection) -> Result<CrawlReport, CrawlError> {
        let mut state = self.store.load();
        let resume = matches!(selection, BlogSelection::Resume);
        let blogs = self.select_blogs(&state, &selection).await?;
        let mut report = CrawlReport::default();

        for blog in &blogs {
            if self.stopped() {
                break;
            }

            match self.crawl_blog(blog, &mut state, resume).await {
                Ok(true) => report.completed += 1,
                Ok(false) => report.interrupted += 1,
                Err(err) => {
                    warn!(blog_id = %blog.id, %err, "blog crawl aborted");
                    self.log(format!("crawl of {} aborted: {}", blog.id, err));
                    report.failed += 1;
                }
            }
        }

        self.emit(CrawlEvent::Finished);
        Ok(report)
    }

    async fn select_blogs(
        &self,
        state: &ProgressState,
        selection: &BlogSelection,
    ) -> Result<Vec<Blog>, CrawlError> {
        let blogs = match selection {
            BlogSelection::Explicit(ids) => {
                let mut blogs = Vec::with_capacity(ids.len());
                for id in ids {
                    match self.db.blogs().get(id).await? {
                        Some(blog) => blogs.push(blog),
                        None => self.log(format!("unknown blog id: {}", id)),
                    }
                }
                blogs
            }
            BlogSelection::Fresh => self
                .db
                .blogs()
                .get_all()
                .await?
                .into_iter()
                .filter(|b| {
                    matches!(b.status, BlogStatus::Pending | BlogStatus::InProgress)
                })
                .collect(),
            BlogSelection::Resume => {
                let mut blogs = Vec::new();
                for record in &state.blogs {
                    if record.status != BlogStatus::InProgress {
                        continue;
                    }
                    match self.db.blogs().get(&record.blog_id).await? {
                        Some(blog) => blogs.push(blog),
                        None => debug!(blog_id = %record.blog_id, "progress record without blog row"),
                    }
                }
                blogs
            }
        };

        Ok(blogs)
    }

    /// Drive one blog through the stages. Ok(true) when every stage
    /// finished with the stop flag never observed.
    async fn crawl_blog(
        &self,
        blog: &Blog,
        state: &mut ProgressState,
        resume: bool,
    ) -> Result<bool, CrawlError> {
        let blog_id = blog.id.as_str();

        self.log(format!("crawling blog: {}", blog.name));
        self.emit(CrawlEvent::BlogStarted {
            blog_id: blog_id.to_string(),
            blog_name: blog.name.clone(),
        });

        self.db
            .blogs()
            .update_status(blog_id, BlogStatus::InProgress)
            .await?;

        if state.blog(blog_id).is_none() {
            state.upsert(
                blog_id,
                BlogProgressUpdate {
                    blog_name: Some(blog.name.clone()),
                    status: Some(BlogStatus::InProgress),
                    total_posts: Some(blog.post_count),
                    ..Default::default()
                },
            );
        } else {
            state.upsert(blog_id, BlogProgressUpdate::status(BlogStatus::InProgress));
        }
        self.store.save(state);
        self.ensure_mirror(blog_id, blog.post_count).await;

        let mut all_ok = true;
        for step in CrawlStep::ALL {
            if self.stopped() {
                all_ok = false;
                break;
            }

            // Skip stages a previous run already finished
            if resume
                && state
                    .blog(blog_id)
                    .map(|b| b.step_status(step) == StepStatus::Completed)
                    .unwrap_or(false)
            {
                debug!(blog_id, step = step.as_str(), "skipping completed stage");
                continue;
            }

            self.emit(CrawlEvent::StageStarted {
                blog_id: blog_id.to_string(),
                step,
            });

            // Persist the in_progress marker before executing, so a crash
            // mid-stage resumes here
            state.upsert(blog_id, BlogProgressUpdate::step(step, StepStatus::InProgress));
            self.store.save(state);
            self.mirror(blog_id, None, Some(step)).await;

            let ok = match step {
                CrawlStep::BlogInfo => self.stage_blog_info(blog_id).await?,
                CrawlStep::PostList => self.stage_post_list(blog_id, state).await?,
                CrawlStep::PostContent => {
                    self.stage_post_content(blog_id, state, resume).await?
                }
                CrawlStep::Reactions => self.stage_reactions(blog_id).await?,
                CrawlStep::Comments => self.stage_comments(blog_id).await?,
            };

            if ok && !self.stopped() {
                state.upsert(blog_id, BlogProgressUpdate::step(step, StepStatus::Completed));
                self.store.save(state);
                self.emit(CrawlEvent::StageCompleted {
                    blog_id: blog_id.to_string(),
                    step,
                });
            } else {
                all_ok = false;
                if self.stopped() {
                    break;
                }
                self.log(format!("stage {} yielded nothing for {}", step.label(), blog_id));
            }
        }

        let finished = all_ok && !self.stopped();
        if finished {
            self.db
                .blogs()
                .update_status(blog_id, BlogStatus::Completed)
                .await?;
            state.upsert(blog_id, BlogProgressUpdate::status(BlogStatus::Completed));
            self.log(format!("blog crawl completed: {}", blog.name));
            self.emit(CrawlEvent::BlogFinished {
                blog_id: blog_id.to_string(),
                status: BlogStatus::Completed,
            });
        } else {
            self.log(format!("blog crawl interrupted: {}", blog.name));
            self.emit(CrawlEvent::BlogFinished {
                blog_id: blog_id.to_string(),
                status: BlogStatus::InProgress,
            });
        }
        self.store.save(state);

        Ok(finished)
    }

    async fn stage_blog_info(&self, blog_id: &str) -> Result<bool, CrawlError> {
        let info = match self.site.fetch_blog_info(blog_id).await {
            Some(info) => info,
            None => return Ok(false),
        };

        self.db
            .blogs()
            .update_info(blog_id, Some(&info.blog_name), info.author_name.as_deref())
            .await?;
        if info.post_count > 0 {
            self.db
                .blogs()
                .update_post_count(blog_id, info.post_count)
                .await?;
        }

        self.log(format!("blog info collected: {}", info.blog_name));
        Ok(true)
    }

    async fn stage_post_list(
        &self,
        blog_id: &str,
        state: &mut ProgressState,
    ) -> Result<bool, CrawlError> {
        let items = self.site.fetch_post_list(blog_id).await;
        if items.is_empty() {
            return Ok(false);
        }

        let seeds: Vec<PostSeed> = items
            .iter()
            .map(|item| PostSeed {
                id: item.id.clone(),
                blog_id: blog_id.to_string(),
                title: item.title.clone(),
                post_url: Some(item.post_url.clone()),
            })
            .collect();

        let added = self.db.posts().add_batch(&seeds).await?;
        self.db
            .blogs()
            .update_post_count(blog_id, items.len() as i64)
            .await?;

        state.upsert(
            blog_id,
            BlogProgressUpdate {
                total_posts: Some(items.len() as i64),
                ..Default::default()
            },
        );
        self.store.save(state);

        self.log(format!("post list: {} posts ({} new)", items.len(), added));
        Ok(true)
    }

    async fn stage_post_content(
        &self,
        blog_id: &str,
        state: &mut ProgressState,
        resume: bool,
    ) -> Result<bool, CrawlError> {
        let posts = self.db.posts().get_by_blog(blog_id).await?;
        if posts.is_empty() {
            return Ok(true);
        }

        // The cursor indexes the full post list in stored order. Only a
        // resumed run trusts a persisted cursor; any other pass resets it so
        // posts added since the last completion are not skipped.
        let start = if resume {
            state
                .blog(blog_id)
                .map(|b| b.current_post_index.max(0) as usize)
                .unwrap_or(0)
        } else {
            state.upsert(blog_id, BlogProgressUpdate::cursor(0));
            self.store.save(state);
            0
        };

        let total = posts.len();

        for (i, post) in posts.iter().enumerate().skip(start) {
            if self.stopped() {
                break;
            }

            match self.site.fetch_post_content(blog_id, post.log_no()).await {
                Some(content) => {
                    self.db
                        .posts()
                        .update_content(
                            &post.id,
                            content.title.as_deref(),
                            content.content.as_deref(),
                            content.category.as_deref(),
                            content.post_date.as_deref(),
                        )
                        .await?;
                    self.db
                        .posts()
                        .update_crawl_status(&post.id, PostCrawlStatus::Completed)
                        .await?;
                }
                None => {
                    self.db
                        .posts()
                        .update_crawl_status(&post.id, PostCrawlStatus::Unavailable)
                        .await?;
                }
            }

            // The cursor advances by exactly one per post and is persisted
            // synchronously; crash safety at post granularity
            let done = (i + 1) as i64;
            state.upsert(blog_id, BlogProgressUpdate::cursor(done));
            self.store.save(state);
            self.mirror(blog_id, Some(done), None).await;

            self.emit(CrawlEvent::PostProgress {
                blog_id: blog_id.to_string(),
                step: CrawlStep::PostContent,
                done: done as u64,
                total: total as u64,
            });
        }

        Ok(!self.stopped())
    }

    async fn stage_reactions(&self, blog_id: &str) -> Result<bool, CrawlError> {
        let posts = self.db.posts().get_by_blog(blog_id).await?;
        if posts.is_empty() {
            return Ok(true);
        }

        let total = posts.len() as u64;
        for (i, post) in posts.iter().enumerate() {
            if self.stopped() {
                break;
            }

            let summary = self.site.fetch_reactions(blog_id, post.log_no()).await;
            self.db
                .posts()
                .update_sympathy_count(&post.id, summary.total_count)
                .await?;
            let reactions: Vec<Reaction> = summary
                .reactions
                .iter()
                .map(|r| Reaction {
                    post_id: post.id.clone(),
                    reaction_type: r.reaction_type.clone(),
                    count: r.count,
                })
                .collect();
            self.db.reactions().upsert_batch(&reactions).await?;

            self.emit(CrawlEvent::PostProgress {
                blog_id: blog_id.to_string(),
                step: CrawlStep::Reactions,
                done: (i + 1) as u64,
                total,
            });
        }

        Ok(!self.stopped())
    }

    async fn stage_comments(&self, blog_id: &str) -> Result<bool, CrawlError> {
        let posts = self.db.posts().get_by_blog(blog_id).await?;
        if posts.is_empty() {
            return Ok(true);
        }

        let total = posts.len() as u64;
        for (i, post) in posts.iter().enumerate() {
            if self.stopped() {
                break;
            }

            let fetched = self.site.fetch_comments(blog_id, post.log_no()).await;
            if !fetched.is_empty() {
                let comments: Vec<Comment> = fetched
                    .into_iter()
                    .map(|c| Comment {
                        id: c.id,
                        post_id: c.post_id,
                        thread: CommentThread::from_parts(c.is_reply, c.parent_id),
                        author: c.author,
                        content: c.content,
                        like_count: c.like_count,
                        written_at: c.written_at,
                    })
                    .collect();

                self.db.comments().add_batch(&comments).await?;
                // The stored count, not the fetched batch size: re-crawls
                // may re-fetch comments already held
                let count = self.db.comments().count_by_post(&post.id).await?;
                self.db.posts().update_comment_count(&post.id, count).await?;
            }

            self.emit(CrawlEvent::PostProgress {
                blog_id: blog_id.to_string(),
                step: CrawlStep::Comments,
                done: (i + 1) as u64,
                total,
            });
        }

        Ok(!self.stopped())
    }

    /// Create the relational mirror row when absent. Best-effort.
    async fn ensure_mirror(&self, blog_id: &str, total_posts: i64) {
        let exists = match self.db.progress().get(blog_id).await {
            Ok(row) => row.is_some(),
            Err(err) => {
                debug!(blog_id, %err, "progress mirror read failed");
                return;
            }
        };
        if !exists {
            if let Err(err) = self.db.progress().init(blog_id, total_posts).await {
                debug!(blog_id, %err, "progress mirror init failed");
            }
        }
    }

    /// Update the relational mirror row. Best-effort: the JSON document is
    /// the source of truth, so mirror failures only log.
    async fn mirror(&self, blog_id: &str, index: Option<i64>, step: Option<CrawlStep>) {
        if let Err(err) = self.db.progress().update(blog_id, index, step).await {
            debug!(blog_id, %err, "progress mirror update failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::repository::test_support::setup_test_db;
    use crate::scrapers::{
        BlogInfo, FetchedComment, PostContent, PostListItem, ReactionCount, ReactionSummary,
    };

    /// Scripted site: serves fixed data and records which fetches ran.
    #[derive(Default)]
    struct ScriptedSite {
        calls: Mutex<Vec<String>>,
        post_count: usize,
        /// Set the flag after this many post-content fetches.
        stop_after_content_fetches: Option<(usize, Arc<AtomicBool>)>,
        fail_blog_info: bool,
    }

    impl ScriptedSite {
        fn with_posts(post_count: usize) -> Self {
            Self {
                post_count,
                ..Default::default()
            }
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BlogSite for ScriptedSite {
        async fn fetch_blog_info(&self, blog_id: &str) -> Option<BlogInfo> {
            self.record("blog_info");
            if self.fail_blog_info {
                return None;
            }
            Some(BlogInfo {
                id: blog_id.to_string(),
                blog_name: format!("{} blog", blog_id),
                author_name: Some("author".to_string()),
                url: format!("https://blog.naver.com/{}", blog_id),
                post_count: self.post_count as i64,
            })
        }

        async fn fetch_post_list(&self, blog_id: &str) -> Vec<PostListItem> {
            self.record("post_list");
            (1..=self.post_count)
                .map(|n| PostListItem {
                    id: format!("{}_{}", blog_id, n),
                    blog_id: blog_id.to_string(),
                    log_no: n.to_string(),
                    title: Some(format!("post {}", n)),
                    post_url: format!("https://blog.naver.com/{}/{}", blog_id, n),
                })
                .collect()
        }

        async fn fetch_post_content(&self, _blog_id: &str, log_no: &str) -> Option<PostContent> {
            self.record(format!("content:{}", log_no));
            if let Some((after, flag)) = &self.stop_after_content_fetches {
                let fetched = self
                    .calls
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|c| c.starts_with("content:"))
                    .count();
                if fetched >= *after {
                    flag.store(true, Ordering::Relaxed);
                }
            }
            Some(PostContent {
                title: Some(format!("title {}", log_no)),
                content: Some("body".to_string()),
                ..Default::default()
            })
        }

        async fn fetch_reactions(&self, _blog_id: &str, log_no: &str) -> ReactionSummary {
            self.record(format!("reactions:{}", log_no));
            ReactionSummary {
                total_count: 5,
                reactions: vec![ReactionCount {
                    reaction_type: "좋아요".to_string(),
                    count: 5,
                }],
            }
        }

        async fn fetch_comments(&self, _blog_id: &str, log_no: &str) -> Vec<FetchedComment> {
            self.record(format!("comments:{}", log_no));
            let post_id = format!("b1_{}", log_no);
            vec![FetchedComment {
                id: format!("{}_c1", post_id),
                post_id,
                parent_id: None,
                is_reply: false,
                author: Some("reader".to_string()),
                content: Some("nice".to_string()),
                like_count: 0,
                written_at: None,
            }]
        }
    }

    async fn session_fixture(
        site: ScriptedSite,
    ) -> (CrawlSession<ScriptedSite>, TempDir, TempDir) {
        let (ctx, db_dir) = setup_test_db().await;
        ctx.blogs()
            .add(&Blog::new(
                "b1".to_string(),
                "b1".to_string(),
                "https://blog.naver.com/b1".to_string(),
            ))
            .await
            .unwrap();

        let progress_dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(progress_dir.path().join("progress.json"));

        (CrawlSession::new(ctx, store, site), db_dir, progress_dir)
    }

    #[tokio::test]
    async fn test_full_run_completes_blog() {
        let (session, _db, _progress) = session_fixture(ScriptedSite::with_posts(2)).await;

        let report = session.run(BlogSelection::Fresh).await.unwrap();
        assert_eq!(report.completed, 1);
        assert_eq!(report.interrupted, 0);

        let blog = session.db.blogs().get("b1").await.unwrap().unwrap();
        assert_eq!(blog.status, BlogStatus::Completed);
        assert_eq!(blog.name, "b1 blog");
        assert_eq!(blog.post_count, 2);

        let posts = session.db.posts().get_by_blog("b1").await.unwrap();
        assert_eq!(posts.len(), 2);
        for post in &posts {
            assert_eq!(post.crawl_status, PostCrawlStatus::Completed);
            assert_eq!(post.sympathy_count, 5);
            assert_eq!(post.comment_count, 1);
        }

        let state = session.store.load();
        assert!(!state.has_incomplete_work());
        let record = state.blog("b1").unwrap();
        assert_eq!(record.status, BlogStatus::Completed);
        assert_eq!(record.next_incomplete_step(), None);
    }

    #[tokio::test]
    async fn test_resume_skips_completed_stages() {
        let (session, _db, _progress) = session_fixture(ScriptedSite::with_posts(2)).await;

        // Seed posts as the post-list stage would have
        for n in 1..=2 {
            session
                .db
                .posts()
                .add(&PostSeed {
                    id: format!("b1_{}", n),
                    blog_id: "b1".to_string(),
                    title: None,
                    post_url: None,
                })
                .await
                .unwrap();
        }

        // Persisted record: [completed, completed, in_progress, pending, pending]
        let mut state = session.store.load();
        state.upsert(
            "b1",
            BlogProgressUpdate {
                blog_name: Some("b1".to_string()),
                status: Some(BlogStatus::InProgress),
                total_posts: Some(2),
                ..Default::default()
            },
        );
        state.upsert(
            "b1",
            BlogProgressUpdate::step(CrawlStep::BlogInfo, StepStatus::Completed),
        );
        state.upsert(
            "b1",
            BlogProgressUpdate::step(CrawlStep::PostList, StepStatus::Completed),
        );
        state.upsert(
            "b1",
            BlogProgressUpdate::step(CrawlStep::PostContent, StepStatus::InProgress),
        );
        session.store.save(&mut state);

        let report = session.run(BlogSelection::Resume).await.unwrap();
        assert_eq!(report.completed, 1);

        let calls = session.site.calls();
        assert!(!calls.contains(&"blog_info".to_string()));
        assert!(!calls.contains(&"post_list".to_string()));
        assert!(calls.contains(&"content:1".to_string()));
        assert!(calls.contains(&"comments:2".to_string()));
    }

    #[tokio::test]
    async fn test_stop_flag_checkpoints_post_cursor() {
        let mut site = ScriptedSite::with_posts(3);
        let flag = Arc::new(AtomicBool::new(false));
        site.stop_after_content_fetches = Some((1, Arc::clone(&flag)));

        let (session, _db, _progress) = session_fixture(site).await;
        // The session must observe the same flag the site sets
        let session = session.with_stop_flag(flag);

        let report = session.run(BlogSelection::Fresh).await.unwrap();
        assert_eq!(report.completed, 0);
        assert_eq!(report.interrupted, 1);

        // The in-flight post finished and the cursor reflects exactly it
        let calls = session.site.calls();
        assert_eq!(
            calls.iter().filter(|c| c.starts_with("content:")).count(),
            1
        );
        let state = session.store.load();
        let record = state.blog("b1").unwrap();
        assert_eq!(record.current_post_index, 1);
        assert_eq!(record.status, BlogStatus::InProgress);
        assert_eq!(
            record.step_status(CrawlStep::PostContent),
            StepStatus::InProgress
        );
        assert_eq!(record.next_incomplete_step(), Some(CrawlStep::PostContent));
        assert!(state.has_incomplete_work());

        // Later stages never ran
        assert!(!calls.iter().any(|c| c.starts_with("reactions:")));
    }

    #[tokio::test]
    async fn test_resume_fetches_every_post_after_the_cursor() {
        let mut site = ScriptedSite::with_posts(3);
        let flag = Arc::new(AtomicBool::new(false));
        site.stop_after_content_fetches = Some((1, Arc::clone(&flag)));

        let (session, _db, progress_dir) = session_fixture(site).await;
        let session = session.with_stop_flag(flag);
        let report = session.run(BlogSelection::Fresh).await.unwrap();
        assert_eq!(report.interrupted, 1);

        // Resume in a new session against the same database and document
        let store = ProgressStore::new(progress_dir.path().join("progress.json"));
        let resumed = CrawlSession::new(session.db.clone(), store, ScriptedSite::with_posts(3));
        let report = resumed.run(BlogSelection::Resume).await.unwrap();
        assert_eq!(report.completed, 1);

        // The post finished before the stop is not refetched; every later
        // post is, including the one immediately at the cursor
        let calls = resumed.site.calls();
        assert!(!calls.contains(&"content:1".to_string()));
        assert!(calls.contains(&"content:2".to_string()));
        assert!(calls.contains(&"content:3".to_string()));

        let posts = resumed.db.posts().get_by_blog("b1").await.unwrap();
        assert_eq!(posts.len(), 3);
        assert!(posts
            .iter()
            .all(|p| p.crawl_status == PostCrawlStatus::Completed));
    }

    #[tokio::test]
    async fn test_explicit_recrawl_starts_content_from_the_top() {
        let (session, _db, progress_dir) = session_fixture(ScriptedSite::with_posts(2)).await;
        let report = session.run(BlogSelection::Fresh).await.unwrap();
        assert_eq!(report.completed, 1);

        // Two new posts appear after completion; the explicit re-crawl must
        // ignore the stale cursor and cover the whole list
        let store = ProgressStore::new(progress_dir.path().join("progress.json"));
        let recrawl = CrawlSession::new(session.db.clone(), store, ScriptedSite::with_posts(4));
        let report = recrawl
            .run(BlogSelection::Explicit(vec!["b1".to_string()]))
            .await
            .unwrap();
        assert_eq!(report.completed, 1);

        let calls = recrawl.site.calls();
        for n in 1..=4 {
            assert!(calls.contains(&format!("content:{}", n)));
        }

        let posts = recrawl.db.posts().get_by_blog("b1").await.unwrap();
        assert_eq!(posts.len(), 4);
        assert!(posts
            .iter()
            .all(|p| p.crawl_status == PostCrawlStatus::Completed));
    }

    #[tokio::test]
    async fn test_failed_stage_leaves_blog_in_progress() {
        let site = ScriptedSite {
            fail_blog_info: true,
            post_count: 1,
            ..Default::default()
        };
        let (session, _db, _progress) = session_fixture(site).await;

        let report = session.run(BlogSelection::Fresh).await.unwrap();
        assert_eq!(report.completed, 0);
        assert_eq!(report.interrupted, 1);

        let blog = session.db.blogs().get("b1").await.unwrap().unwrap();
        assert_eq!(blog.status, BlogStatus::InProgress);

        let state = session.store.load();
        let record = state.blog("b1").unwrap();
        // The failed stage keeps its in_progress marker; later stages ran
        assert_eq!(
            record.step_status(CrawlStep::BlogInfo),
            StepStatus::InProgress
        );
        assert_eq!(
            record.step_status(CrawlStep::PostList),
            StepStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_fresh_selection_skips_completed_blogs() {
        let (session, _db, _progress) = session_fixture(ScriptedSite::with_posts(1)).await;
        session
            .db
            .blogs()
            .add(&Blog::new(
                "done".to_string(),
                "done".to_string(),
                "https://blog.naver.com/done".to_string(),
            ))
            .await
            .unwrap();
        session
            .db
            .blogs()
            .update_status("done", BlogStatus::Completed)
            .await
            .unwrap();

        session.run(BlogSelection::Fresh).await.unwrap();

        let calls = session.site.calls();
        assert_eq!(
            calls.iter().filter(|c| *c == "blog_info").count(),
            1,
            "completed blog must not be re-crawled"
        );
    }
}
