// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Content-store row types.

/// Fields for a post to be created.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub post_type: String,
    pub status: String,
    pub title: String,
    pub content: String,
    pub author: String,
    /// Publication timestamp (RFC3339 UTC); the store fills in "now" when
    /// absent.
    pub published_at: Option<String>,
}

/// Summary row for the listing surface and maintenance scans.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published_at: String,
}
