// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity publishing service.
//!
//! Handles the core workflow:
//! 1. Guard the incoming operation and activity id
//! 2. Look up an existing post by activity id (any status)
//! 3. Update title/body/raw snapshot, or create a fresh published post
//! 4. Attach the reconciliation metadata on create

use crate::db::{meta_keys, ContentStore, ACTIVITY_POST_TYPE, STATUS_PUBLISH};
use crate::error::{AppError, Result};
use crate::models::{ActivityRecord, NewPost};
use crate::services::format::{format_activity_html, sanitize_title};
use crate::time_utils::format_utc_rfc3339;

/// Operations from the event stream that trigger an upsert.
const HANDLED_OPERATIONS: [&str; 2] = ["create", "update"];

/// Category stored when a record carries neither type field.
const UNKNOWN_CATEGORY: &str = "Unknown";

/// Create-or-update of activity posts keyed by the Strava activity id.
pub struct ActivityPublisher {
    store: ContentStore,
    author: String,
}

/// Result of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(i64),
    Updated(i64),
    Ignored,
}

impl ActivityPublisher {
    pub fn new(store: ContentStore, author: impl Into<String>) -> Self {
        Self {
            store,
            author: author.into(),
        }
    }

    /// Apply an activity-changed event.
    ///
    /// Anything other than a create/update operation carrying a record
    /// with an id is silently ignored.
    pub async fn upsert(
        &self,
        operation: &str,
        activity: &ActivityRecord,
    ) -> Result<UpsertOutcome> {
        if !HANDLED_OPERATIONS.contains(&operation) {
            tracing::debug!(operation, "Ignoring unhandled operation");
            return Ok(UpsertOutcome::Ignored);
        }
        let Some(activity_id) = activity.id else {
            tracing::debug!(operation, "Ignoring activity event without an id");
            return Ok(UpsertOutcome::Ignored);
        };

        let title = sanitize_title(activity.name.as_deref().unwrap_or(""));
        let content = format_activity_html(activity);
        let raw_json = serde_json::to_string(activity)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize activity: {}", e)))?;

        // Status-blind lookup: a soft-deleted or drafted post still
        // counts, otherwise a second event would duplicate it.
        let existing = self
            .store
            .find_post_by_meta(meta_keys::ACTIVITY_ID, &activity_id.to_string())
            .await?;

        if let Some(post_id) = existing {
            self.store.update_post(post_id, &title, &content).await?;
            // Refresh the raw snapshot; the stored category keeps its
            // imported value.
            self.store
                .set_meta(post_id, meta_keys::ACTIVITY_DATA, &raw_json)
                .await?;

            tracing::info!(activity_id, post_id, "Activity post updated");
            return Ok(UpsertOutcome::Updated(post_id));
        }

        let published_at = resolve_start_date(activity);

        let post_id = self
            .store
            .insert_post(&NewPost {
                post_type: ACTIVITY_POST_TYPE.to_string(),
                status: STATUS_PUBLISH.to_string(),
                title,
                content,
                author: self.author.clone(),
                published_at,
            })
            .await?;

        self.store
            .set_meta(post_id, meta_keys::ACTIVITY_ID, &activity_id.to_string())
            .await?;
        self.store
            .set_meta(post_id, meta_keys::ACTIVITY_DATA, &raw_json)
            .await?;
        self.store
            .set_meta(
                post_id,
                meta_keys::ACTIVITY_TYPE,
                activity.category().unwrap_or(UNKNOWN_CATEGORY),
            )
            .await?;

        tracing::info!(activity_id, post_id, "Activity post created");
        Ok(UpsertOutcome::Created(post_id))
    }
}

/// Publication timestamp for a new post: `start_date`, then
/// `start_date_local`, then the store default. A present-but-unparsable
/// date falls through to the default rather than the next field.
fn resolve_start_date(activity: &ActivityRecord) -> Option<String> {
    activity
        .start_date
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .or_else(|| {
            activity
                .start_date_local
                .as_deref()
                .filter(|raw| !raw.is_empty())
        })
        .and_then(|raw| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|date| format_utc_rfc3339(date.with_timezone(&chrono::Utc)))
        })
}
