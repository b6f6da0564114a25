//! Blog repository: crawl-target rows, status updates, cascade deletion.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::parse_datetime;
use super::pool::{AsyncSqlitePool, DieselError};
use super::records::{BlogRecord, NewBlog};
use crate::models::{Blog, BlogStatus, PostCrawlStatus};
use crate::schema::{blogs, comments, posts, progress, reactions};

impl From<BlogRecord> for Blog {
    fn from(record: BlogRecord) -> Self {
        Blog {
            id: record.id,
            name: record.blog_name,
            author_name: record.author_name,
            url: record.url,
            post_count: record.post_count,
            status: BlogStatus::from_str(&record.status).unwrap_or(BlogStatus::Pending),
            created_at: parse_datetime(&record.created_at),
        }
    }
}

/// Live aggregate counts for one blog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogStats {
    pub total_posts: i64,
    pub posts_completed: i64,
    pub total_comments: i64,
}

/// Blog repository with compile-time query checking.
#[derive(Clone)]
pub struct BlogRepository {
    pool: AsyncSqlitePool,
}

impl BlogRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a blog if absent. Returns false when the identifier is
    /// already tracked, which callers use to distinguish "already added".
    pub async fn add(&self, blog: &Blog) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;
        let created_at = blog.created_at.to_rfc3339();

        let inserted = diesel::insert_or_ignore_into(blogs::table)
            .values(NewBlog {
                id: &blog.id,
                blog_name: &blog.name,
                author_name: blog.author_name.as_deref(),
                url: &blog.url,
                post_count: blog.post_count,
                status: blog.status.as_str(),
                created_at: &created_at,
            })
            .execute(&mut conn)
            .await?;

        Ok(inserted == 1)
    }

    /// Get a blog by ID.
    pub async fn get(&self, id: &str) -> Result<Option<Blog>, DieselError> {
        let mut conn = self.pool.get().await?;

        blogs::table
            .find(id)
            .first::<BlogRecord>(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(Blog::from))
    }

    /// Get all blogs, most recently added first.
    pub async fn get_all(&self) -> Result<Vec<Blog>, DieselError> {
        let mut conn = self.pool.get().await?;

        blogs::table
            .order(blogs::created_at.desc())
            .load::<BlogRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(Blog::from).collect())
    }

    /// Update the lifecycle status.
    pub async fn update_status(&self, id: &str, status: BlogStatus) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::update(blogs::table.find(id))
            .set(blogs::status.eq(status.as_str()))
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }

    /// Update display name and/or author name; fields given as None are
    /// left untouched.
    pub async fn update_info(
        &self,
        id: &str,
        blog_name: Option<&str>,
        author_name: Option<&str>,
    ) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows = match (blog_name, author_name) {
            (Some(name), Some(author)) => {
                diesel::update(blogs::table.find(id))
                    .set((blogs::blog_name.eq(name), blogs::author_name.eq(author)))
                    .execute(&mut conn)
                    .await?
            }
            (Some(name), None) => {
                diesel::update(blogs::table.find(id))
                    .set(blogs::blog_name.eq(name))
                    .execute(&mut conn)
                    .await?
            }
            (None, Some(author)) => {
                diesel::update(blogs::table.find(id))
                    .set(blogs::author_name.eq(author))
                    .execute(&mut conn)
                    .await?
            }
            (None, None) => 0,
        };

        Ok(rows > 0)
    }

    /// Update the total post count as last observed.
    pub async fn update_post_count(&self, id: &str, count: i64) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::update(blogs::table.find(id))
            .set(blogs::post_count.eq(count))
            .execute(&mut conn)
            .await?;

        Ok(rows > 0)
    }

    /// Delete a blog and everything that hangs off it: comments of its
    /// posts, reactions of its posts, the posts, the progress mirror row,
    /// then the blog row itself, in FK-respecting order.
    ///
    /// Deleting a nonexistent blog is not an error.
    pub async fn delete(&self, id: &str) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let post_ids = posts::table
            .filter(posts::blog_id.eq(id))
            .select(posts::id);

        diesel::delete(comments::table.filter(comments::post_id.eq_any(post_ids)))
            .execute(&mut conn)
            .await?;

        let post_ids = posts::table
            .filter(posts::blog_id.eq(id))
            .select(posts::id);
        diesel::delete(reactions::table.filter(reactions::post_id.eq_any(post_ids)))
            .execute(&mut conn)
            .await?;

        diesel::delete(posts::table.filter(posts::blog_id.eq(id)))
            .execute(&mut conn)
            .await?;

        diesel::delete(progress::table.filter(progress::blog_id.eq(id)))
            .execute(&mut conn)
            .await?;

        diesel::delete(blogs::table.find(id))
            .execute(&mut conn)
            .await?;

        Ok(true)
    }

    /// Aggregate counts for one blog, computed live.
    pub async fn stats(&self, id: &str) -> Result<BlogStats, DieselError> {
        use diesel::dsl::count_star;

        let mut conn = self.pool.get().await?;

        let total_posts: i64 = posts::table
            .filter(posts::blog_id.eq(id))
            .select(count_star())
            .first(&mut conn)
            .await?;

        let posts_completed: i64 = posts::table
            .filter(posts::blog_id.eq(id))
            .filter(posts::crawl_status.eq(PostCrawlStatus::Completed.as_str()))
            .select(count_star())
            .first(&mut conn)
            .await?;

        let total_comments: i64 = comments::table
            .inner_join(posts::table)
            .filter(posts::blog_id.eq(id))
            .select(count_star())
            .first(&mut conn)
            .await?;

        Ok(BlogStats {
            total_posts,
            posts_completed,
            total_comments,
        })
    }
}
