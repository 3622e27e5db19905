// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook route for activity-changed events from the sync pipeline.

use crate::error::Result;
use crate::models::ActivityRecord;
use crate::services::ActivityPublisher;
use crate::AppState;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/webhook/activity", post(handle_event))
}

/// Activity-changed event payload.
#[derive(Deserialize, Debug)]
struct ActivityEvent {
    /// "create", "update", or anything else (ignored)
    operation: String,
    #[serde(default)]
    activity: Option<ActivityRecord>,
}

/// Handle an incoming activity-changed event (POST).
///
/// Events that are not actionable (unknown operation, missing record or
/// id, unparsable body) are acknowledged with 200 so the sender does
/// not retry; only store failures surface as errors.
async fn handle_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> Result<StatusCode> {
    let event: ActivityEvent = match serde_json::from_value(payload) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse activity event");
            return Ok(StatusCode::OK);
        }
    };

    let Some(activity) = event.activity else {
        tracing::debug!(operation = %event.operation, "Activity event without a record, ignoring");
        return Ok(StatusCode::OK);
    };

    tracing::info!(
        operation = %event.operation,
        activity_id = activity.id,
        "Activity event received"
    );

    let publisher = ActivityPublisher::new(
        state.content.clone(),
        state.config.post_author.clone(),
    );
    publisher.upsert(&event.operation, &activity).await?;

    Ok(StatusCode::OK)
}
