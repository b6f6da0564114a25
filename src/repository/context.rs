//! Database context for managing connections and repository access.
//!
//! Provides a unified entry point for database operations using Diesel ORM
//! over SQLite.

use std::path::Path;

use diesel_async::SimpleAsyncConnection;

use super::blog::BlogRepository;
use super::comment::CommentRepository;
use super::pool::{AsyncSqlitePool, DieselError};
use super::post::PostRepository;
use super::progress::ProgressRepository;
use super::reaction::ReactionRepository;

/// Database context that manages connections and provides repository access.
///
/// Create one context per command or session, then use it to access all
/// repositories.
#[derive(Clone)]
pub struct DbContext {
    pool: AsyncSqlitePool,
}

impl DbContext {
    /// Create a new database context from a file path.
    pub fn new(db_path: &Path) -> Self {
        Self {
            pool: AsyncSqlitePool::from_path(db_path),
        }
    }

    /// Create a context with an existing pool.
    pub fn with_pool(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &AsyncSqlitePool {
        &self.pool
    }

    /// Get a blog repository.
    pub fn blogs(&self) -> BlogRepository {
        BlogRepository::new(self.pool.clone())
    }

    /// Get a post repository.
    pub fn posts(&self) -> PostRepository {
        PostRepository::new(self.pool.clone())
    }

    /// Get a reaction repository.
    pub fn reactions(&self) -> ReactionRepository {
        ReactionRepository::new(self.pool.clone())
    }

    /// Get a comment repository.
    pub fn comments(&self) -> CommentRepository {
        CommentRepository::new(self.pool.clone())
    }

    /// Get a progress-mirror repository.
    pub fn progress(&self) -> ProgressRepository {
        ProgressRepository::new(self.pool.clone())
    }

    /// Initialize the database schema.
    ///
    /// Creates the necessary tables and indexes if they don't exist.
    pub async fn init_schema(&self) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute(
            r#"
            -- Blogs table
            CREATE TABLE IF NOT EXISTS blogs (
                id TEXT PRIMARY KEY,
                blog_name TEXT NOT NULL,
                author_name TEXT,
                url TEXT NOT NULL,
                post_count INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL
            );

            -- Posts table
            CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                blog_id TEXT NOT NULL,
                title TEXT,
                content TEXT,
                category TEXT,
                post_url TEXT,
                post_date TEXT,
                comment_count INTEGER NOT NULL DEFAULT 0,
                sympathy_count INTEGER NOT NULL DEFAULT 0,
                crawl_status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL,
                FOREIGN KEY (blog_id) REFERENCES blogs(id)
            );

            -- Reactions table
            CREATE TABLE IF NOT EXISTS reactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id TEXT NOT NULL,
                reaction_type TEXT NOT NULL,
                count INTEGER NOT NULL DEFAULT 0,
                UNIQUE(post_id, reaction_type),
                FOREIGN KEY (post_id) REFERENCES posts(id)
            );

            -- Comments table
            CREATE TABLE IF NOT EXISTS comments (
                id TEXT PRIMARY KEY,
                post_id TEXT NOT NULL,
                parent_id TEXT,
                author TEXT,
                content TEXT,
                like_count INTEGER NOT NULL DEFAULT 0,
                written_at TEXT,
                is_reply INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (post_id) REFERENCES posts(id),
                FOREIGN KEY (parent_id) REFERENCES comments(id)
            );

            -- Progress mirror table
            CREATE TABLE IF NOT EXISTS progress (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                blog_id TEXT NOT NULL UNIQUE,
                current_post_index INTEGER NOT NULL DEFAULT 0,
                total_posts INTEGER NOT NULL DEFAULT 0,
                current_step TEXT NOT NULL DEFAULT 'blog_info',
                last_updated TEXT NOT NULL,
                FOREIGN KEY (blog_id) REFERENCES blogs(id)
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_posts_blog_id ON posts(blog_id);
            CREATE INDEX IF NOT EXISTS idx_reactions_post_id ON reactions(post_id);
            CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments(post_id);
            CREATE INDEX IF NOT EXISTS idx_comments_parent_id ON comments(parent_id);
            CREATE INDEX IF NOT EXISTS idx_progress_blog_id ON progress(blog_id);
            "#,
        )
        .await
    }

    /// Get list of all tables in the database.
    pub async fn list_tables(&self) -> Result<Vec<String>, DieselError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<TableName> = diesel_async::RunQueryDsl::load(
            diesel::sql_query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            ),
            &mut conn,
        )
        .await?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }
}

#[derive(diesel::QueryableByName)]
struct TableName {
    #[diesel(sql_type = diesel::sql_types::Text)]
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_schema_creates_all_tables() {
        let dir = tempdir().unwrap();
        let ctx = DbContext::new(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();

        let tables = ctx.list_tables().await.unwrap();
        for table in ["blogs", "posts", "reactions", "comments", "progress"] {
            assert!(tables.contains(&table.to_string()), "missing {}", table);
        }

        // Idempotent
        ctx.init_schema().await.unwrap();
    }
}
