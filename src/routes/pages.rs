// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public listing page for imported activities.

use crate::db::meta_keys;
use crate::error::{AppError, Result};
use crate::services::format::activity_emoji;
use crate::time_utils::format_display_date;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Listing length when the query does not say otherwise.
const DEFAULT_COUNT: i64 = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/activities", get(list_activities))
}

#[derive(Deserialize)]
struct ListingQuery {
    count: Option<i64>,
}

/// One entry on the listing page.
struct ListingItem {
    emoji: &'static str,
    title: String,
    date: String,
    content: String,
}

#[derive(Template)]
#[template(path = "activities.html")]
struct ActivitiesTemplate {
    items: Vec<ListingItem>,
}

/// Render the most recent published activities.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> Result<Html<String>> {
    let count = query.count.unwrap_or(DEFAULT_COUNT).max(1);
    let posts = state.content.list_published(count).await?;

    let mut items = Vec::with_capacity(posts.len());
    for post in posts {
        let category = state
            .content
            .get_meta(post.id, meta_keys::ACTIVITY_TYPE)
            .await?
            .unwrap_or_default();
        items.push(ListingItem {
            emoji: activity_emoji(&category),
            title: post.title,
            date: format_display_date(&post.published_at),
            content: post.content,
        });
    }

    let page = ActivitiesTemplate { items };
    let html = page
        .render()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Template render failed: {}", e)))?;
    Ok(Html(html))
}
