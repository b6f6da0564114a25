//! Progress mirror repository.
//!
//! The JSON progress document is the source of truth for resume decisions;
//! this table mirrors the coarse position (step + post cursor) into the
//! relational store so it can be inspected alongside the entities.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::pool::{AsyncSqlitePool, DieselError};
use super::records::{NewProgress, ProgressRecord};
use crate::progress::CrawlStep;
use crate::schema::progress;

/// Progress mirror repository.
#[derive(Clone)]
pub struct ProgressRepository {
    pool: AsyncSqlitePool,
}

impl ProgressRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize (or reset) the mirror row for a blog.
    pub async fn init(&self, blog_id: &str, total_posts: i64) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();

        diesel::replace_into(progress::table)
            .values(NewProgress {
                blog_id,
                current_post_index: 0,
                total_posts,
                current_step: CrawlStep::BlogInfo.as_str(),
                last_updated: &now,
            })
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    /// Get the mirror row for a blog.
    pub async fn get(&self, blog_id: &str) -> Result<Option<ProgressRecord>, DieselError> {
        let mut conn = self.pool.get().await?;

        progress::table
            .filter(progress::blog_id.eq(blog_id))
            .first::<ProgressRecord>(&mut conn)
            .await
            .optional()
    }

    /// Update cursor and/or step for a blog; absent fields are untouched.
    pub async fn update(
        &self,
        blog_id: &str,
        current_post_index: Option<i64>,
        current_step: Option<CrawlStep>,
    ) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().to_rfc3339();

        let rows = match (current_post_index, current_step) {
            (Some(index), Some(step)) => {
                diesel::update(progress::table.filter(progress::blog_id.eq(blog_id)))
                    .set((
                        progress::current_post_index.eq(index),
                        progress::current_step.eq(step.as_str()),
                        progress::last_updated.eq(&now),
                    ))
                    .execute(&mut conn)
                    .await?
            }
            (Some(index), None) => {
                diesel::update(progress::table.filter(progress::blog_id.eq(blog_id)))
                    .set((
                        progress::current_post_index.eq(index),
                        progress::last_updated.eq(&now),
                    ))
                    .execute(&mut conn)
                    .await?
            }
            (None, Some(step)) => {
                diesel::update(progress::table.filter(progress::blog_id.eq(blog_id)))
                    .set((
                        progress::current_step.eq(step.as_str()),
                        progress::last_updated.eq(&now),
                    ))
                    .execute(&mut conn)
                    .await?
            }
            (None, None) => {
                diesel::update(progress::table.filter(progress::blog_id.eq(blog_id)))
                    .set(progress::last_updated.eq(&now))
                    .execute(&mut conn)
                    .await?
            }
        };

        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Blog;
    use crate::repository::test_support::setup_test_db;

    #[tokio::test]
    async fn test_mirror_lifecycle() {
        let (ctx, _dir) = setup_test_db().await;
        ctx.blogs()
            .add(&Blog::new(
                "b1".to_string(),
                "b1".to_string(),
                "https://blog.naver.com/b1".to_string(),
            ))
            .await
            .unwrap();
        let repo = ctx.progress();

        assert!(repo.get("b1").await.unwrap().is_none());

        repo.init("b1", 50).await.unwrap();
        let row = repo.get("b1").await.unwrap().unwrap();
        assert_eq!(row.total_posts, 50);
        assert_eq!(row.current_step, "blog_info");
        assert_eq!(row.current_post_index, 0);

        repo.update("b1", Some(7), Some(CrawlStep::PostContent))
            .await
            .unwrap();
        let row = repo.get("b1").await.unwrap().unwrap();
        assert_eq!(row.current_post_index, 7);
        assert_eq!(row.current_step, "post_content");

        // Re-init resets the cursor
        repo.init("b1", 50).await.unwrap();
        let row = repo.get("b1").await.unwrap().unwrap();
        assert_eq!(row.current_post_index, 0);
    }
}
