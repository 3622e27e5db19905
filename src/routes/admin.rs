// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Operator page: bulk import, re-render, purge.
//!
//! Every mutating action is gated by a replay-protection token tied to
//! that action. The page itself shows only aggregate counts; per-record
//! diagnostics stay in the logs.

use crate::error::{AppError, Result};
use crate::services::ImportService;
use crate::AppState;
use askama::Template;
use axum::{extract::State, response::Html, routing::get, Form, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Form action names; the nonce ties a submission to its action.
mod actions {
    pub const IMPORT: &str = "import";
    pub const REFRESH: &str = "refresh";
    pub const PURGE: &str = "purge";
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/admin/import", get(show_page).post(handle_action))
}

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminTemplate {
    staged_raw: i64,
    staged_normalized: i64,
    imported: i64,
    notice: String,
    import_nonce: String,
    refresh_nonce: String,
    purge_nonce: String,
}

#[derive(Deserialize)]
struct AdminForm {
    action: String,
    nonce: String,
}

fn import_service(state: &AppState) -> ImportService {
    ImportService::new(
        state.content.clone(),
        state.staging.clone(),
        state.config.post_author.clone(),
    )
}

async fn render_page(state: &AppState, notice: String) -> Result<Html<String>> {
    let status = import_service(state).status().await?;

    let page = AdminTemplate {
        staged_raw: status.staged_raw,
        staged_normalized: status.staged_normalized,
        imported: status.imported,
        notice,
        import_nonce: state.nonce.issue(actions::IMPORT),
        refresh_nonce: state.nonce.issue(actions::REFRESH),
        purge_nonce: state.nonce.issue(actions::PURGE),
    };
    let html = page
        .render()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Template render failed: {}", e)))?;
    Ok(Html(html))
}

/// Show the admin page (GET).
async fn show_page(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    render_page(&state, String::new()).await
}

/// Run an admin action (POST) and re-render the page with a notice.
async fn handle_action(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AdminForm>,
) -> Result<Html<String>> {
    if !state.nonce.verify(&form.action, &form.nonce) {
        tracing::warn!(action = %form.action, "Rejected admin action with invalid nonce");
        return Err(AppError::InvalidNonce);
    }

    let service = import_service(&state);
    let notice = match form.action.as_str() {
        actions::IMPORT => {
            let source = service.preferred_source().await?;
            let outcome = service.import(source, true).await?;
            let mut notice = format!("✅ {} imported", outcome.created);
            if outcome.skipped > 0 {
                notice.push_str(&format!(", {} already existed", outcome.skipped));
            }
            if outcome.errored > 0 {
                notice.push_str(&format!(", {} failed", outcome.errored));
            }
            notice
        }
        actions::REFRESH => {
            let updated = service.refresh_rendering().await?;
            format!("✅ {} activities re-rendered", updated)
        }
        actions::PURGE => {
            let deleted = service.purge().await?;
            format!("🗑️ {} activities deleted", deleted)
        }
        other => {
            return Err(AppError::BadRequest(format!("Unknown action: {}", other)));
        }
    };

    render_page(&state, notice).await
}
