// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pure formatting of activity records into display fragments.
//!
//! Everything here is deterministic string code: the same record always
//! produces byte-identical output, which is what makes re-rendering
//! stored posts safe.

use crate::models::ActivityRecord;

/// Strava activity permalink base.
const ACTIVITY_URL_BASE: &str = "https://www.strava.com/activities";

/// Categories that get a pace stat (compared lowercased).
const PACE_CATEGORIES: [&str; 4] = ["run", "virtualrun", "walk", "hike"];

/// Render the stats card for an activity.
///
/// Stats appear in a fixed order (distance, duration, pace, elevation),
/// each included only when it carries information; the duration is
/// always shown. An outbound link is appended when the record has an id.
pub fn format_activity_html(activity: &ActivityRecord) -> String {
    let category = activity.category().unwrap_or("Activity");
    let distance_km = round2(activity.distance.unwrap_or(0.0) / 1000.0);
    let moving_time = match activity.moving_time {
        Some(seconds) => format_duration(seconds),
        None => "00:00".to_string(),
    };
    let elevation = activity.total_elevation_gain.unwrap_or(0.0).round() as i64;

    let mut stats: Vec<String> = Vec::new();
    if distance_km > 0.0 {
        stats.push(format!(
            "<span class='strava-stat'><strong>{}</strong> km</span>",
            format_km(distance_km)
        ));
    }
    stats.push(format!(
        "<span class='strava-stat'><strong>{}</strong></span>",
        moving_time
    ));
    if let Some(pace) = format_pace(activity, distance_km, category) {
        stats.push(format!(
            "<span class='strava-stat'><strong>{}</strong> /km</span>",
            pace
        ));
    }
    if elevation > 0 {
        stats.push(format!(
            "<span class='strava-stat'><strong>{}</strong> m↑</span>",
            elevation
        ));
    }

    let mut content = String::from("<div class=\"strava-card\">");
    content.push_str("<div class=\"strava-stats\">");
    content.push_str(&stats.concat());
    content.push_str("</div>");
    if let Some(id) = activity.id {
        content.push_str(&format!(
            "<a href='{}/{}' target='_blank' rel='noopener' class='strava-link'>View on Strava →</a>",
            ACTIVITY_URL_BASE, id
        ));
    }
    content.push_str("</div>");
    content
}

/// Format seconds as `H:MM:SS` when at least an hour, `M:SS` otherwise.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Category glyph for the listing page. Total: unknown categories get
/// the medal.
pub fn activity_emoji(category: &str) -> &'static str {
    match category.to_lowercase().as_str() {
        "run" | "virtualrun" => "🏃",
        "ride" | "virtualride" => "🚴",
        "swim" => "🏊",
        "walk" => "🚶",
        "hike" => "🥾",
        "workout" => "💪",
        "weighttraining" => "🏋️",
        "yoga" => "🧘",
        _ => "🏅",
    }
}

/// Plain-text sanitation for post titles: strips tags and control
/// characters, collapses whitespace runs.
pub fn sanitize_title(raw: &str) -> String {
    let mut stripped = String::with_capacity(raw.len());
    let mut in_tag = false;
    for ch in raw.chars() {
        if ch == '<' {
            in_tag = true;
            continue;
        }
        if ch == '>' {
            in_tag = false;
            continue;
        }
        if in_tag {
            continue;
        }
        if ch.is_control() {
            stripped.push(' ');
        } else {
            stripped.push(ch);
        }
    }
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pace per km, only for foot-powered categories with real distance.
fn format_pace(activity: &ActivityRecord, distance_km: f64, category: &str) -> Option<String> {
    let moving_time = activity.moving_time?;
    if distance_km <= 0.0 || !PACE_CATEGORIES.contains(&category.to_lowercase().as_str()) {
        return None;
    }

    let pace_seconds = moving_time as f64 / distance_km;
    let mut minutes = (pace_seconds / 60.0).floor() as u64;
    let mut seconds = (pace_seconds % 60.0).round() as u64;
    // Rounding can push seconds to 60; carry into the minutes
    if seconds == 60 {
        minutes += 1;
        seconds = 0;
    }
    Some(format!("{}:{:02}", minutes, seconds))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a km value with up to two decimals, trailing zeros trimmed.
fn format_km(km: f64) -> String {
    let rendered = format!("{:.2}", km);
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_activity() -> ActivityRecord {
        ActivityRecord {
            id: Some(42),
            name: Some("Morning".to_string()),
            activity_type: Some("Run".to_string()),
            distance: Some(10_000.0),
            moving_time: Some(3_000),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_duration_under_a_minute() {
        assert_eq!(format_duration(45), "0:45");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(125), "2:05");
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration(3661), "1:01:01");
    }

    #[test]
    fn test_pace_for_run() {
        let activity = ActivityRecord {
            activity_type: Some("Run".to_string()),
            distance: Some(5_000.0),
            moving_time: Some(1_500),
            ..Default::default()
        };
        let html = format_activity_html(&activity);
        assert!(html.contains("<strong>5:00</strong> /km"));
    }

    #[test]
    fn test_no_pace_for_ride() {
        let activity = ActivityRecord {
            activity_type: Some("Ride".to_string()),
            distance: Some(5_000.0),
            moving_time: Some(1_500),
            ..Default::default()
        };
        assert!(!format_activity_html(&activity).contains("/km"));
    }

    #[test]
    fn test_no_pace_without_distance() {
        let activity = ActivityRecord {
            activity_type: Some("Run".to_string()),
            distance: Some(0.0),
            moving_time: Some(1_500),
            ..Default::default()
        };
        assert!(!format_activity_html(&activity).contains("/km"));
    }

    #[test]
    fn test_pace_category_is_case_insensitive() {
        let activity = ActivityRecord {
            activity_type: Some("VirtualRun".to_string()),
            distance: Some(5_000.0),
            moving_time: Some(1_500),
            ..Default::default()
        };
        assert!(format_activity_html(&activity).contains("/km"));
    }

    #[test]
    fn test_pace_seconds_carry_into_minutes() {
        // 1793 s over 5 km is 358.6 s/km; the rounded remainder hits 60
        let activity = ActivityRecord {
            activity_type: Some("Run".to_string()),
            distance: Some(5_000.0),
            moving_time: Some(1_793),
            ..Default::default()
        };
        let html = format_activity_html(&activity);
        assert!(html.contains("<strong>6:00</strong> /km"), "{}", html);
    }

    #[test]
    fn test_distance_trims_trailing_zeros() {
        let html = format_activity_html(&run_activity());
        assert!(html.contains("<strong>10</strong> km"));

        let activity = ActivityRecord {
            distance: Some(5_432.0),
            ..Default::default()
        };
        assert!(format_activity_html(&activity).contains("<strong>5.43</strong> km"));

        let activity = ActivityRecord {
            distance: Some(5_100.0),
            ..Default::default()
        };
        assert!(format_activity_html(&activity).contains("<strong>5.1</strong> km"));
    }

    #[test]
    fn test_zero_stats_are_omitted() {
        let activity = ActivityRecord {
            moving_time: Some(600),
            ..Default::default()
        };
        let html = format_activity_html(&activity);
        assert!(!html.contains("km</span>"));
        assert!(!html.contains("m↑"));
        // Duration is always shown
        assert!(html.contains("<strong>10:00</strong>"));
    }

    #[test]
    fn test_missing_moving_time_renders_placeholder() {
        let activity = ActivityRecord::default();
        assert!(format_activity_html(&activity).contains("<strong>00:00</strong>"));
    }

    #[test]
    fn test_elevation_is_rounded() {
        let activity = ActivityRecord {
            total_elevation_gain: Some(123.6),
            ..Default::default()
        };
        assert!(format_activity_html(&activity).contains("<strong>124</strong> m↑"));
    }

    #[test]
    fn test_link_requires_id() {
        let html = format_activity_html(&run_activity());
        assert!(html.contains("https://www.strava.com/activities/42"));

        let activity = ActivityRecord {
            id: None,
            ..run_activity()
        };
        assert!(!format_activity_html(&activity).contains("strava-link"));
    }

    #[test]
    fn test_stats_appear_in_fixed_order() {
        let activity = ActivityRecord {
            id: Some(1),
            activity_type: Some("Hike".to_string()),
            distance: Some(8_000.0),
            moving_time: Some(7_200),
            total_elevation_gain: Some(400.0),
            ..Default::default()
        };
        let html = format_activity_html(&activity);
        let km = html.find(" km<").unwrap();
        let duration = html.find("2:00:00").unwrap();
        let pace = html.find(" /km<").unwrap();
        let elevation = html.find(" m↑<").unwrap();
        assert!(km < duration && duration < pace && pace < elevation);
    }

    #[test]
    fn test_format_is_deterministic() {
        let activity = run_activity();
        assert_eq!(
            format_activity_html(&activity),
            format_activity_html(&activity)
        );
    }

    #[test]
    fn test_emoji_lookup() {
        assert_eq!(activity_emoji("ride"), "🚴");
        assert_eq!(activity_emoji("RUN"), activity_emoji("run"));
        assert_eq!(activity_emoji("kayaking"), "🏅");
        assert_eq!(activity_emoji(""), "🏅");
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Morning Run"), "Morning Run");
        assert_eq!(sanitize_title("<b>Morning</b> Run"), "Morning Run");
        assert_eq!(sanitize_title("Morning\tRun\n"), "Morning Run");
        assert_eq!(sanitize_title("  Morning   Run  "), "Morning Run");
    }
}
