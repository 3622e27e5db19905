// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Posts server
//!
//! Publishes staged Strava activities as posts and serves the public
//! listing and the admin reconciliation page.

use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use strava_posts::{
    config::Config,
    db::{ContentStore, StagingStore},
    services::NonceService,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Strava-Posts");

    // One pool serves both the content tables and the read-only staging
    // tables; the upstream sync pipeline writes to the same database.
    let pool = SqlitePoolOptions::new()
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let content = ContentStore::new(pool.clone());
    content
        .init_schema()
        .await
        .expect("Failed to initialize content schema");
    let staging = StagingStore::new(pool);

    let nonce = NonceService::new(&config.nonce_key);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        content,
        staging,
        nonce,
    });

    // Build router
    let app = strava_posts::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_posts=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
