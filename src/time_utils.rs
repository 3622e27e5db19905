// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a stored RFC3339 timestamp for the listing page ("9 Mar 2024").
///
/// Unparsable timestamps render as an empty string rather than failing
/// the whole page.
pub fn format_display_date(rfc3339: &str) -> String {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|date| date.format("%-d %b %Y").to_string())
        .unwrap_or_default()
}
