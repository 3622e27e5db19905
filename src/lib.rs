// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava-Posts: publish Strava activities as posts
//!
//! This crate ingests staged Strava activities (raw or normalized) and
//! materializes them as published posts with a rendered stats card, a
//! public listing page, and an admin page for bulk reconciliation.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{ContentStore, StagingStore};
use services::NonceService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub content: ContentStore,
    pub staging: StagingStore,
    pub nonce: NonceService,
}
