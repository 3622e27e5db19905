// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bulk import and maintenance over the staging tables.
//!
//! Each staged record is handled independently and committed
//! immediately: a bad row is counted and skipped, never retried, and
//! never rolls back its neighbors. Only aggregate counts are surfaced.

use crate::db::{meta_keys, ContentStore, StagingStore};
use crate::error::Result;
use crate::models::ActivityRecord;
use crate::services::activity::ActivityPublisher;
use crate::services::format::format_activity_html;
use crate::time_utils::format_utc_rfc3339;

/// Rows handled by one ordinary import run.
const IMPORT_BATCH: i64 = 50;
/// Effective "no limit" cap for full imports.
const IMPORT_BATCH_ALL: i64 = 99_999;

/// Which staging table an import reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSource {
    Raw,
    Normalized,
}

/// Aggregate accounting for one import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub created: u32,
    pub skipped: u32,
    pub errored: u32,
}

/// Counts shown on the admin page.
#[derive(Debug, Clone, Copy)]
pub struct ImportStatus {
    pub staged_raw: i64,
    pub staged_normalized: i64,
    pub imported: i64,
}

/// Bulk import, purge and re-render over the content store.
pub struct ImportService {
    content: ContentStore,
    staging: StagingStore,
    publisher: ActivityPublisher,
}

impl ImportService {
    pub fn new(content: ContentStore, staging: StagingStore, author: impl Into<String>) -> Self {
        let publisher = ActivityPublisher::new(content.clone(), author);
        Self {
            content,
            staging,
            publisher,
        }
    }

    /// The staging source an "import everything" action should read:
    /// the raw table when it exists, the normalized table otherwise.
    pub async fn preferred_source(&self) -> Result<ImportSource> {
        Ok(if self.staging.raw_table_exists().await? {
            ImportSource::Raw
        } else {
            ImportSource::Normalized
        })
    }

    /// Import a batch of staged records, newest first.
    pub async fn import(&self, source: ImportSource, all: bool) -> Result<ImportOutcome> {
        let limit = if all { IMPORT_BATCH_ALL } else { IMPORT_BATCH };
        let outcome = match source {
            ImportSource::Raw => self.import_raw(limit).await?,
            ImportSource::Normalized => self.import_normalized(limit).await?,
        };

        tracing::info!(
            created = outcome.created,
            skipped = outcome.skipped,
            errored = outcome.errored,
            "Import finished"
        );
        Ok(outcome)
    }

    async fn import_raw(&self, limit: i64) -> Result<ImportOutcome> {
        let mut outcome = ImportOutcome::default();

        for row in self.staging.fetch_raw(limit).await? {
            let Some(raw) = row.raw_activity.filter(|blob| !blob.is_empty()) else {
                outcome.errored += 1;
                continue;
            };
            let activity: ActivityRecord = match serde_json::from_str(&raw) {
                Ok(activity) => activity,
                Err(e) => {
                    tracing::warn!(staging_id = row.id, error = %e, "Undecodable staged activity");
                    outcome.errored += 1;
                    continue;
                }
            };
            let Some(activity_id) = activity.id else {
                outcome.errored += 1;
                continue;
            };
            self.create_if_missing(activity_id, &activity, &mut outcome)
                .await;
        }

        Ok(outcome)
    }

    async fn import_normalized(&self, limit: i64) -> Result<ImportOutcome> {
        let mut outcome = ImportOutcome::default();
        let now = format_utc_rfc3339(chrono::Utc::now());

        for row in self.staging.fetch_normalized(limit).await? {
            let Some(activity_id) = row.activity_id.filter(|id| *id > 0) else {
                outcome.errored += 1;
                continue;
            };

            let activity = ActivityRecord {
                id: Some(activity_id as u64),
                name: Some(row.name.unwrap_or_else(|| "Activity".to_string())),
                activity_type: Some(row.activity_type.unwrap_or_else(|| "Workout".to_string())),
                sport_type: None,
                distance: Some(row.distance.unwrap_or(0.0)),
                moving_time: Some(row.moving_time.unwrap_or(0).max(0) as u64),
                total_elevation_gain: Some(row.total_elevation_gain.unwrap_or(0.0)),
                start_date: Some(row.start_date.unwrap_or_else(|| now.clone())),
                start_date_local: None,
                average_speed: Some(row.average_speed.unwrap_or(0.0)),
                average_heartrate: Some(row.average_heartrate.unwrap_or(0.0)),
                calories: Some(row.calories.unwrap_or(0.0)),
            };

            self.create_if_missing(activity_id as u64, &activity, &mut outcome)
                .await;
        }

        Ok(outcome)
    }

    /// Existence-check-then-create for one staged record. Failures are
    /// folded into the errored count; the batch keeps going.
    async fn create_if_missing(
        &self,
        activity_id: u64,
        activity: &ActivityRecord,
        outcome: &mut ImportOutcome,
    ) {
        let existing = self
            .content
            .find_post_by_meta(meta_keys::ACTIVITY_ID, &activity_id.to_string())
            .await;

        match existing {
            Ok(Some(_)) => outcome.skipped += 1,
            Ok(None) => match self.publisher.upsert("create", activity).await {
                Ok(_) => outcome.created += 1,
                Err(e) => {
                    tracing::error!(activity_id, error = %e, "Failed to create activity post");
                    outcome.errored += 1;
                }
            },
            Err(e) => {
                tracing::error!(activity_id, error = %e, "Existence check failed");
                outcome.errored += 1;
            }
        }
    }

    /// Permanently delete every imported activity post.
    pub async fn purge(&self) -> Result<u64> {
        let deleted = self.content.delete_all_activity_posts().await?;
        tracing::info!(deleted, "Purged activity posts");
        Ok(deleted)
    }

    /// Regenerate the body of every published post from its stored raw
    /// record. Titles and metadata are untouched; posts without a
    /// readable raw snapshot are skipped.
    pub async fn refresh_rendering(&self) -> Result<u64> {
        let mut updated = 0u64;

        for post in self.content.list_published(-1).await? {
            let Some(raw) = self.content.get_meta(post.id, meta_keys::ACTIVITY_DATA).await? else {
                continue;
            };
            let activity: ActivityRecord = match serde_json::from_str(&raw) {
                Ok(activity) => activity,
                Err(e) => {
                    tracing::warn!(post_id = post.id, error = %e, "Unreadable raw activity meta");
                    continue;
                }
            };

            self.content
                .update_post_content(post.id, &format_activity_html(&activity))
                .await?;
            updated += 1;
        }

        tracing::info!(updated, "Re-rendered activity posts");
        Ok(updated)
    }

    /// Counts for the admin status box.
    pub async fn status(&self) -> Result<ImportStatus> {
        Ok(ImportStatus {
            staged_raw: self.staging.count_raw().await?,
            staged_normalized: self.staging.count_normalized().await?,
            imported: self.content.count_published().await?,
        })
    }
}
