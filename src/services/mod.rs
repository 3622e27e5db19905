// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod format;
pub mod import;
pub mod nonce;

pub use activity::{ActivityPublisher, UpsertOutcome};
pub use import::{ImportService, ImportSource};
pub use nonce::NonceService;
