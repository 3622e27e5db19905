// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Content store: posts and their key-value metadata.
//!
//! Provides high-level operations for:
//! - Posts (create, update, listing, bulk delete)
//! - Post metadata (get/set, lookup by value)

use crate::db::{ACTIVITY_POST_TYPE, STATUS_PUBLISH};
use crate::error::AppError;
use crate::models::{NewPost, PostSummary};
use crate::time_utils::format_utc_rfc3339;
use sqlx::SqlitePool;

const SQL_CREATE_POSTS: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_type TEXT NOT NULL,
    status TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    content TEXT NOT NULL DEFAULT '',
    author TEXT NOT NULL DEFAULT '',
    published_at TEXT NOT NULL
)
"#;

const SQL_CREATE_POSTS_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_posts_type_status_date
ON posts (post_type, status, published_at)
"#;

const SQL_CREATE_POST_META: &str = r#"
CREATE TABLE IF NOT EXISTS post_meta (
    post_id INTEGER NOT NULL REFERENCES posts (id),
    meta_key TEXT NOT NULL,
    meta_value TEXT NOT NULL,
    PRIMARY KEY (post_id, meta_key)
)
"#;

const SQL_CREATE_POST_META_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_post_meta_key_value
ON post_meta (meta_key, meta_value)
"#;

const SQL_FIND_POST_BY_META: &str = r#"
SELECT p.id
FROM posts p
JOIN post_meta m ON m.post_id = p.id
WHERE p.post_type = ? AND m.meta_key = ? AND m.meta_value = ?
LIMIT 1
"#;

const SQL_INSERT_POST: &str = r#"
INSERT INTO posts (post_type, status, title, content, author, published_at)
VALUES (?, ?, ?, ?, ?, ?)
"#;

const SQL_UPDATE_POST: &str = r#"
UPDATE posts SET title = ?, content = ? WHERE id = ?
"#;

const SQL_UPDATE_POST_CONTENT: &str = r#"
UPDATE posts SET content = ? WHERE id = ?
"#;

const SQL_SET_META: &str = r#"
INSERT OR REPLACE INTO post_meta (post_id, meta_key, meta_value)
VALUES (?, ?, ?)
"#;

const SQL_GET_META: &str = r#"
SELECT meta_value FROM post_meta WHERE post_id = ? AND meta_key = ?
"#;

const SQL_LIST_PUBLISHED: &str = r#"
SELECT id, title, content, published_at
FROM posts
WHERE post_type = ? AND status = ?
ORDER BY published_at DESC, id DESC
LIMIT ?
"#;

const SQL_COUNT_PUBLISHED: &str = r#"
SELECT COUNT(*) FROM posts WHERE post_type = ? AND status = ?
"#;

const SQL_DELETE_META_FOR_TYPE: &str = r#"
DELETE FROM post_meta
WHERE post_id IN (SELECT id FROM posts WHERE post_type = ?)
"#;

const SQL_DELETE_POSTS_FOR_TYPE: &str = r#"
DELETE FROM posts WHERE post_type = ?
"#;

/// Content store client.
#[derive(Clone)]
pub struct ContentStore {
    pool: SqlitePool,
}

impl ContentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool (the staging tables share the database).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the content tables if they do not exist.
    ///
    /// Only the tables owned by this service; the staging tables belong
    /// to the upstream sync pipeline.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(SQL_CREATE_POSTS).execute(&self.pool).await?;
        sqlx::query(SQL_CREATE_POSTS_INDEX)
            .execute(&self.pool)
            .await?;
        sqlx::query(SQL_CREATE_POST_META)
            .execute(&self.pool)
            .await?;
        sqlx::query(SQL_CREATE_POST_META_INDEX)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ─── Post Operations ─────────────────────────────────────────

    /// Find an activity post by a metadata value, matching ANY status.
    ///
    /// The status-blind match is what keeps the one-post-per-activity-id
    /// invariant: a drafted or unpublished post still counts as existing.
    pub async fn find_post_by_meta(
        &self,
        meta_key: &str,
        meta_value: &str,
    ) -> Result<Option<i64>, AppError> {
        let id: Option<i64> = sqlx::query_scalar(SQL_FIND_POST_BY_META)
            .bind(ACTIVITY_POST_TYPE)
            .bind(meta_key)
            .bind(meta_value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    /// Create a post and return its id.
    pub async fn insert_post(&self, post: &NewPost) -> Result<i64, AppError> {
        let published_at = post
            .published_at
            .clone()
            .unwrap_or_else(|| format_utc_rfc3339(chrono::Utc::now()));

        let result = sqlx::query(SQL_INSERT_POST)
            .bind(&post.post_type)
            .bind(&post.status)
            .bind(&post.title)
            .bind(&post.content)
            .bind(&post.author)
            .bind(&published_at)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Update a post's title and content.
    pub async fn update_post(&self, id: i64, title: &str, content: &str) -> Result<(), AppError> {
        sqlx::query(SQL_UPDATE_POST)
            .bind(title)
            .bind(content)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Update a post's content only, leaving the title untouched.
    pub async fn update_post_content(&self, id: i64, content: &str) -> Result<(), AppError> {
        sqlx::query(SQL_UPDATE_POST_CONTENT)
            .bind(content)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// List published activity posts, most recent first.
    ///
    /// A negative limit means no limit (SQLite convention).
    pub async fn list_published(&self, limit: i64) -> Result<Vec<PostSummary>, AppError> {
        let posts = sqlx::query_as::<_, PostSummary>(SQL_LIST_PUBLISHED)
            .bind(ACTIVITY_POST_TYPE)
            .bind(STATUS_PUBLISH)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    /// Count published activity posts.
    pub async fn count_published(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(SQL_COUNT_PUBLISHED)
            .bind(ACTIVITY_POST_TYPE)
            .bind(STATUS_PUBLISH)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Permanently delete every activity post (any status) and its
    /// metadata. Returns the number of posts removed.
    pub async fn delete_all_activity_posts(&self) -> Result<u64, AppError> {
        sqlx::query(SQL_DELETE_META_FOR_TYPE)
            .bind(ACTIVITY_POST_TYPE)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query(SQL_DELETE_POSTS_FOR_TYPE)
            .bind(ACTIVITY_POST_TYPE)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // ─── Metadata Operations ─────────────────────────────────────

    /// Set a metadata value, replacing any previous value for the key.
    pub async fn set_meta(
        &self,
        post_id: i64,
        meta_key: &str,
        meta_value: &str,
    ) -> Result<(), AppError> {
        sqlx::query(SQL_SET_META)
            .bind(post_id)
            .bind(meta_key)
            .bind(meta_value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Get a metadata value.
    pub async fn get_meta(&self, post_id: i64, meta_key: &str) -> Result<Option<String>, AppError> {
        let value: Option<String> = sqlx::query_scalar(SQL_GET_META)
            .bind(post_id)
            .bind(meta_key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }
}
