//! Comment repository.
//!
//! Comments are insert-or-ignore: captured content is immutable history, so
//! an existing identifier is left untouched rather than overwritten.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::pool::{AsyncSqlitePool, DieselError};
use super::records::{CommentRecord, NewComment};
use crate::models::{Comment, CommentThread};
use crate::schema::comments;

impl From<CommentRecord> for Comment {
    fn from(record: CommentRecord) -> Self {
        Comment {
            id: record.id,
            post_id: record.post_id,
            thread: CommentThread::from_parts(record.is_reply != 0, record.parent_id),
            author: record.author,
            content: record.content,
            like_count: record.like_count,
            written_at: record.written_at,
        }
    }
}

/// Comment repository with compile-time query checking.
#[derive(Clone)]
pub struct CommentRepository {
    pool: AsyncSqlitePool,
}

impl CommentRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a comment if absent; an existing identifier is silently
    /// ignored. Returns whether a row was inserted.
    pub async fn add(&self, comment: &Comment) -> Result<bool, DieselError> {
        let mut conn = self.pool.get().await?;

        let inserted = diesel::insert_or_ignore_into(comments::table)
            .values(NewComment {
                id: &comment.id,
                post_id: &comment.post_id,
                parent_id: comment.thread.parent_id(),
                author: comment.author.as_deref(),
                content: comment.content.as_deref(),
                like_count: comment.like_count,
                written_at: comment.written_at.as_deref(),
                is_reply: comment.thread.is_reply() as i32,
            })
            .execute(&mut conn)
            .await?;

        Ok(inserted == 1)
    }

    /// Insert many comments, skipping existing identifiers individually.
    /// Returns the number of rows actually inserted.
    pub async fn add_batch(&self, batch: &[Comment]) -> Result<usize, DieselError> {
        let mut conn = self.pool.get().await?;
        let mut added = 0;

        for comment in batch {
            added += diesel::insert_or_ignore_into(comments::table)
                .values(NewComment {
                    id: &comment.id,
                    post_id: &comment.post_id,
                    parent_id: comment.thread.parent_id(),
                    author: comment.author.as_deref(),
                    content: comment.content.as_deref(),
                    like_count: comment.like_count,
                    written_at: comment.written_at.as_deref(),
                    is_reply: comment.thread.is_reply() as i32,
                })
                .execute(&mut conn)
                .await?;
        }

        Ok(added)
    }

    /// Get comments for a post ordered by written-at, optionally excluding
    /// replies.
    pub async fn get_by_post(
        &self,
        post_id: &str,
        include_replies: bool,
    ) -> Result<Vec<Comment>, DieselError> {
        let mut conn = self.pool.get().await?;

        let mut query = comments::table
            .filter(comments::post_id.eq(post_id))
            .into_boxed();

        if !include_replies {
            query = query.filter(comments::is_reply.eq(0));
        }

        query
            .order(comments::written_at.asc())
            .load::<CommentRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(Comment::from).collect())
    }

    /// Count comments for a post.
    pub async fn count_by_post(&self, post_id: &str) -> Result<i64, DieselError> {
        use diesel::dsl::count_star;

        let mut conn = self.pool.get().await?;

        comments::table
            .filter(comments::post_id.eq(post_id))
            .select(count_star())
            .first(&mut conn)
            .await
    }
}
