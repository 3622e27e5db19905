// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity record as delivered by the upstream sync pipeline.

use serde::{Deserialize, Serialize};

/// Incoming activity record.
///
/// Every field is optional: staged rows are sparse and the ingestion
/// boundary is lenient by design. Numeric fields absent from the record
/// are treated as zero wherever a derived value needs them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Strava activity ID, the reconciliation key
    pub id: Option<u64>,
    /// Activity name/title
    pub name: Option<String>,
    /// Activity type ("Run", "Ride", ...); older records carry this field
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    /// Sport type; newer records carry this instead of `type`
    pub sport_type: Option<String>,
    /// Distance in meters
    pub distance: Option<f64>,
    /// Moving time in seconds
    pub moving_time: Option<u64>,
    /// Total elevation gain in meters
    pub total_elevation_gain: Option<f64>,
    /// Start date/time (RFC3339)
    pub start_date: Option<String>,
    /// Start date/time in the athlete's local timezone (RFC3339)
    pub start_date_local: Option<String>,
    /// Average speed in m/s
    pub average_speed: Option<f64>,
    /// Average heart rate in bpm
    pub average_heartrate: Option<f64>,
    /// Calories burned
    pub calories: Option<f64>,
}

impl ActivityRecord {
    /// Resolved category: `type` wins over `sport_type`.
    pub fn category(&self) -> Option<&str> {
        self.activity_type
            .as_deref()
            .or(self.sport_type.as_deref())
    }
}
