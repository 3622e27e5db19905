// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use strava_posts::config::Config;
use strava_posts::db::{ContentStore, StagingStore};
use strava_posts::routes::create_router;
use strava_posts::services::NonceService;
use strava_posts::AppState;

/// Open an in-memory database with the content schema and empty staging
/// tables.
#[allow(dead_code)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    ContentStore::new(pool.clone())
        .init_schema()
        .await
        .expect("Failed to initialize content schema");
    create_staging_tables(&pool).await;

    pool
}

/// Create the staging tables the upstream sync pipeline would own.
#[allow(dead_code)]
pub async fn create_staging_tables(pool: &SqlitePool) {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS strava_activities_raw (\
         id INTEGER PRIMARY KEY, raw_activity TEXT, date_added TEXT)",
    )
    .execute(pool)
    .await
    .expect("Failed to create raw staging table");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS strava_activities (\
         strava_activity_id INTEGER, name TEXT, type TEXT, \
         distance REAL, moving_time INTEGER, total_elevation_gain REAL, \
         start_date TEXT, average_speed REAL, average_heartrate REAL, calories REAL)",
    )
    .execute(pool)
    .await
    .expect("Failed to create normalized staging table");
}

/// Stage a serialized activity record in the raw table.
#[allow(dead_code)]
pub async fn stage_raw(pool: &SqlitePool, raw_activity: &str, date_added: &str) {
    sqlx::query("INSERT INTO strava_activities_raw (raw_activity, date_added) VALUES (?, ?)")
        .bind(raw_activity)
        .bind(date_added)
        .execute(pool)
        .await
        .expect("Failed to stage raw activity");
}

/// Create a test app over a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let pool = test_pool().await;
    let config = Config::test_default();
    let content = ContentStore::new(pool.clone());
    let staging = StagingStore::new(pool);
    let nonce = NonceService::new(&config.nonce_key);

    let state = Arc::new(AppState {
        config,
        content,
        staging,
        nonce,
    });

    (create_router(state.clone()), state)
}
