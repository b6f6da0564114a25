//! Diesel ORM records for database tables.
//!
//! These models provide compile-time type checking for database operations.
//! Conversions to the domain models live next to the repository that loads
//! each record type.

use diesel::prelude::*;

use crate::schema;

/// Blog record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::blogs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BlogRecord {
    pub id: String,
    pub blog_name: String,
    pub author_name: Option<String>,
    pub url: String,
    pub post_count: i64,
    pub status: String,
    pub created_at: String,
}

/// New blog for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::blogs)]
pub struct NewBlog<'a> {
    pub id: &'a str,
    pub blog_name: &'a str,
    pub author_name: Option<&'a str>,
    pub url: &'a str,
    pub post_count: i64,
    pub status: &'a str,
    pub created_at: &'a str,
}

/// Post record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PostRecord {
    pub id: String,
    pub blog_id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub post_url: Option<String>,
    pub post_date: Option<String>,
    pub comment_count: i64,
    pub sympathy_count: i64,
    pub crawl_status: String,
    pub created_at: String,
}

/// New post for insertion (post-list stage: identity and title/url only).
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::posts)]
pub struct NewPost<'a> {
    pub id: &'a str,
    pub blog_id: &'a str,
    pub title: Option<&'a str>,
    pub post_url: Option<&'a str>,
    pub crawl_status: &'a str,
    pub created_at: &'a str,
}

/// Reaction record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::reactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReactionRecord {
    pub id: i32,
    pub post_id: String,
    pub reaction_type: String,
    pub count: i64,
}

/// New reaction for upsert.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::reactions)]
pub struct NewReaction<'a> {
    pub post_id: &'a str,
    pub reaction_type: &'a str,
    pub count: i64,
}

/// Comment record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::comments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CommentRecord {
    pub id: String,
    pub post_id: String,
    pub parent_id: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub like_count: i64,
    pub written_at: Option<String>,
    pub is_reply: i32,
}

/// New comment for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::comments)]
pub struct NewComment<'a> {
    pub id: &'a str,
    pub post_id: &'a str,
    pub parent_id: Option<&'a str>,
    pub author: Option<&'a str>,
    pub content: Option<&'a str>,
    pub like_count: i64,
    pub written_at: Option<&'a str>,
    pub is_reply: i32,
}

/// Progress mirror record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::progress)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProgressRecord {
    pub id: i32,
    pub blog_id: String,
    pub current_post_index: i64,
    pub total_posts: i64,
    pub current_step: String,
    pub last_updated: String,
}

/// New progress row for upsert.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::progress)]
pub struct NewProgress<'a> {
    pub blog_id: &'a str,
    pub current_post_index: i64,
    pub total_posts: i64,
    pub current_step: &'a str,
    pub last_updated: &'a str,
}
