//! Post repository: list-stage inserts and content-stage enrichment.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::parse_datetime;
use super::pool::{AsyncSqlitePool, DieselError};
use super::records::{NewPost, PostRecord};
use crate::models::{Post, PostCrawlStatus};
use crate::schema::posts;

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        Post {
            id: record.id,
            blog_id: record.blog_id,
            title: record.title,
            content: record.content,
            category: record.category,
            post_url: record.post_url,
            post_date: record.post_date,
            comment_count: record.comment_count,
            sympathy_count: record.sympathy_count,
            crawl_status: PostCrawlStatus::from_str(&record.crawl_status)
                .unwrap_or(PostCrawlStatus::Pending),
            created_at: parse_datetime(&record.created_at),
        }
    }
}

/// A post as discovered by the post-list stage.
#[derive(Debug, Clone)]
pub struct PostSeed {
    pub id: String,
    pub blog_id: String,
    pub title: Option<String>,
    pub post_url: Option<String>,
}

/// Post repository with compile-time query checking.
#[derive(Clone)]
pub struct PostRepository {
    pool: AsyncSqlitePool,
}

impl PostRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a post if absent; false when the identifier already exists.
    pub async fn add(&self, seed: &PostSeed) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;
        let created_at = Utc::now().to_rfc3339();

        let inserted = diesel::insert_or_ignore_into(posts::table)
            .values(NewPost {
                id: &seed.id,
                blog_id: &seed.blog_id,
                title: seed.title.as_deref(),
                post_url: seed.post_url.as_deref(),
                crawl_status: PostCrawlStatus::Pending.as_str(),
                created_at: &created_at,
            })
            .execute(&mut conn)
            .await?;

        Ok(inserted == 1)
    }

    /// Insert many posts; duplicates are skipped individually so one
    /// already-known row never aborts the batch. Returns the number of rows
    /// actually inserted.
    pub async fn add_batch(&self, seeds: &[PostSeed]) -> Result<usize, DieselError> {
        let mut conn = self.pool.get().await?;
        let created_at = Utc::now().to_rfc3339();
        let mut added = 0;

        for seed in seeds {
            added += diesel::insert_or_ignore_into(posts::table)
                .values(NewPost {
                    id: &seed.id,
                    blog_id: &seed.blog_id,
                    title: seed.title.as_deref(),
                    post_url: seed.post_url.as_deref(),
                    crawl_status: PostCrawlStatus::Pending.as_str(),
                    created_at: &created_at,
                })
                .execute(&mut conn)
                .await?;
        }

        Ok(added)
    }

    /// Get a post by ID.
    pub async fn get(&self, id: &str) -> Result<Option<Post>, DieselError> {
        let mut conn = self.pool.get().await?;

        posts::table
            .find(id)
            .first::<PostRecord>(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(Post::from))
    }

    /// Get all posts for a blog in insertion order.
    pub async fn get_by_blog(&self, blog_id: &str) -> Result<Vec<Post>, DieselError> {
        let mut conn = self.pool.get().await?;

        posts::table
            .filter(posts::blog_id.eq(blog_id))
            .order(posts::created_at.asc())
            .load::<PostRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(Post::from).collect())
    }

    /// Get posts for a blog, optionally filtered by crawl status. Omitting
    /// the filter returns every post for the blog.
    pub async fn get_by_status(
        &self,
        blog_id: &str,
        status: Option<PostCrawlStatus>,
    ) -> Result<Vec<Post>, DieselError> {
        let mut conn = self.pool.get().await?;

        let mut query = posts::table
            .filter(posts::blog_id.eq(blog_id))
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(posts::crawl_status.eq(status.as_str()));
        }

        query
            .order(posts::created_at.asc())
            .load::<PostRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(Post::from).collect())
    }

    /// Enrich a post with the fields captured by the post-content stage.
    /// None fields are left untouched.
    pub async fn update_content(
        &self,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
        category: Option<&str>,
        post_date: Option<&str>,
    ) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;
        let mut rows = 0;

        // Diesel's typed changesets do not express "skip absent fields"
        // cleanly across four independent options; issue one update per
        // present field instead. The post-content stage runs one post at a
        // time, so this stays cheap.
        if let Some(title) = title {
            rows += diesel::update(posts::table.find(id))
                .set(posts::title.eq(title))
                .execute(&mut conn)
                .await?;
        }
        if let Some(content) = content {
            rows += diesel::update(posts::table.find(id))
                .set(posts::content.eq(content))
                .execute(&mut conn)
                .await?;
        }
        if let Some(category) = category {
            rows += diesel::update(posts::table.find(id))
                .set(posts::category.eq(category))
                .execute(&mut conn)
                .await?;
        }
        if let Some(post_date) = post_date {
            rows += diesel::update(posts::table.find(id))
                .set(posts::post_date.eq(post_date))
                .execute(&mut conn)
                .await?;
        }

        Ok(rows > 0)
    }

    /// Update the per-post crawl status.
    pub async fn update_crawl_status(
        &self,
        id: &str,
        status: PostCrawlStatus,
    ) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::update(posts::table.find(id))
            .set(posts::crawl_status.eq(status.as_str()))
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }

    /// Update the aggregate reaction count.
    pub async fn update_sympathy_count(&self, id: &str, count: i64) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::update(posts::table.find(id))
            .set(posts::sympathy_count.eq(count))
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }

    /// Update the comment count.
    pub async fn update_comment_count(&self, id: &str, count: i64) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::update(posts::table.find(id))
            .set(posts::comment_count.eq(count))
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }
}
