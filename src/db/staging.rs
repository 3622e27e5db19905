// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only access to the staging tables populated by the upstream
//! sync pipeline.
//!
//! Two tables: a raw table holding serialized activity records, and a
//! normalized table holding flattened columns. Either table may be
//! absent on a given installation, so every read probes for the table
//! first and counts fall back to zero.

use crate::db::tables;
use crate::error::AppError;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SQL_TABLE_EXISTS: &str = r#"
SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?
"#;

const SQL_FETCH_RAW: &str = r#"
SELECT id, raw_activity
FROM strava_activities_raw
ORDER BY date_added DESC
LIMIT ?
"#;

const SQL_FETCH_NORMALIZED: &str = r#"
SELECT *
FROM strava_activities
ORDER BY start_date DESC
LIMIT ?
"#;

/// Row from the raw staging table.
#[derive(Debug, sqlx::FromRow)]
pub struct RawStagedRow {
    pub id: i64,
    pub raw_activity: Option<String>,
}

/// Flattened row from the normalized staging table.
///
/// The external id column name varies across upstream schema versions;
/// [`StagingStore::fetch_normalized`] probes the known aliases in
/// priority order and surfaces the first hit here.
#[derive(Debug, Default)]
pub struct NormalizedStagedRow {
    pub activity_id: Option<i64>,
    pub name: Option<String>,
    pub activity_type: Option<String>,
    pub distance: Option<f64>,
    pub moving_time: Option<i64>,
    pub total_elevation_gain: Option<f64>,
    pub start_date: Option<String>,
    pub average_speed: Option<f64>,
    pub average_heartrate: Option<f64>,
    pub calories: Option<f64>,
}

/// Staging store client (read-only).
#[derive(Clone)]
pub struct StagingStore {
    pool: SqlitePool,
}

impl StagingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn table_exists(&self, table: &str) -> Result<bool, AppError> {
        let name: Option<String> = sqlx::query_scalar(SQL_TABLE_EXISTS)
            .bind(table)
            .fetch_optional(&self.pool)
            .await?;
        Ok(name.is_some())
    }

    pub async fn raw_table_exists(&self) -> Result<bool, AppError> {
        self.table_exists(tables::STAGING_RAW).await
    }

    pub async fn normalized_table_exists(&self) -> Result<bool, AppError> {
        self.table_exists(tables::STAGING_NORMALIZED).await
    }

    /// Count rows in the raw staging table; 0 when the table is absent.
    pub async fn count_raw(&self) -> Result<i64, AppError> {
        if !self.raw_table_exists().await? {
            return Ok(0);
        }
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM strava_activities_raw")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count rows in the normalized staging table; 0 when absent.
    pub async fn count_normalized(&self) -> Result<i64, AppError> {
        if !self.normalized_table_exists().await? {
            return Ok(0);
        }
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM strava_activities")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Fetch up to `limit` raw rows, most recently added first.
    pub async fn fetch_raw(&self, limit: i64) -> Result<Vec<RawStagedRow>, AppError> {
        let rows = sqlx::query_as::<_, RawStagedRow>(SQL_FETCH_RAW)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Fetch up to `limit` normalized rows, most recently started first.
    pub async fn fetch_normalized(&self, limit: i64) -> Result<Vec<NormalizedStagedRow>, AppError> {
        let rows = sqlx::query(SQL_FETCH_NORMALIZED)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(flatten_normalized_row).collect())
    }
}

/// Map a normalized row, tolerating absent columns.
fn flatten_normalized_row(row: &SqliteRow) -> NormalizedStagedRow {
    NormalizedStagedRow {
        // External id column aliases, in priority order
        activity_id: opt_column(row, "strava_activity_id")
            .or_else(|| opt_column(row, "activity_id"))
            .or_else(|| opt_column(row, "id")),
        name: opt_column(row, "name"),
        activity_type: opt_column(row, "type"),
        distance: opt_column(row, "distance"),
        moving_time: opt_column(row, "moving_time"),
        total_elevation_gain: opt_column(row, "total_elevation_gain"),
        start_date: opt_column(row, "start_date"),
        average_speed: opt_column(row, "average_speed"),
        average_heartrate: opt_column(row, "average_heartrate"),
        calories: opt_column(row, "calories"),
    }
}

/// Read a nullable column, treating a missing column the same as NULL.
fn opt_column<'r, T>(row: &'r SqliteRow, name: &str) -> Option<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get::<Option<T>, _>(name).ok().flatten()
}
