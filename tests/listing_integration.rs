// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Integration tests for the public listing page.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

async fn get_listing(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn publish_activity(app: &axum::Router, activity: serde_json::Value) {
    let event = json!({"operation": "create", "activity": activity});
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook/activity")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&event).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_listing_shows_placeholder() {
    let (app, _state) = common::create_test_app().await;

    let (status, body) = get_listing(&app, "/activities").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No activities yet."));
    assert!(!body.contains("strava-item"));
}

#[tokio::test]
async fn test_listing_shows_emoji_title_date_and_stats() {
    let (app, _state) = common::create_test_app().await;
    publish_activity(
        &app,
        json!({
            "id": 42,
            "name": "Morning",
            "type": "Run",
            "distance": 10000.0,
            "moving_time": 3000,
            "start_date": "2024-03-09T08:00:00Z"
        }),
    )
    .await;

    let (status, body) = get_listing(&app, "/activities").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("🏃 Morning"));
    assert!(body.contains("9 Mar 2024"));
    assert!(body.contains("<strong>10</strong> km"));
    assert!(body.contains("https://www.strava.com/activities/42"));
}

#[tokio::test]
async fn test_listing_uses_stored_category_for_emoji() {
    let (app, _state) = common::create_test_app().await;
    publish_activity(&app, json!({"id": 1, "name": "Spin", "type": "Ride"})).await;
    publish_activity(&app, json!({"id": 2, "name": "Paddle", "type": "Kayaking"})).await;

    let (_, body) = get_listing(&app, "/activities").await;
    assert!(body.contains("🚴 Spin"));
    // Unknown categories fall back to the medal
    assert!(body.contains("🏅 Paddle"));
}

#[tokio::test]
async fn test_listing_escapes_titles() {
    let (app, state) = common::create_test_app().await;
    // A title with markup characters that survive sanitation
    publish_activity(&app, json!({"id": 1, "name": "Intervals & hills"})).await;

    assert_eq!(state.content.count_published().await.unwrap(), 1);
    let (_, body) = get_listing(&app, "/activities").await;
    assert!(body.contains("Intervals &amp; hills"));
}

#[tokio::test]
async fn test_listing_count_parameter() {
    let (app, _state) = common::create_test_app().await;
    for i in 1..=3 {
        publish_activity(
            &app,
            json!({
                "id": i,
                "name": format!("Activity {}", i),
                "type": "Run",
                "start_date": format!("2024-03-0{}T08:00:00Z", i)
            }),
        )
        .await;
    }

    let (_, body) = get_listing(&app, "/activities?count=2").await;
    // Most recent two only
    assert!(body.contains("Activity 3"));
    assert!(body.contains("Activity 2"));
    assert!(!body.contains("Activity 1"));

    let (_, body) = get_listing(&app, "/activities").await;
    assert!(body.contains("Activity 1"));
}

#[tokio::test]
async fn test_listing_orders_newest_first() {
    let (app, _state) = common::create_test_app().await;
    publish_activity(
        &app,
        json!({"id": 1, "name": "Older", "start_date": "2024-01-01T08:00:00Z"}),
    )
    .await;
    publish_activity(
        &app,
        json!({"id": 2, "name": "Newer", "start_date": "2024-06-01T08:00:00Z"}),
    )
    .await;

    let (_, body) = get_listing(&app, "/activities").await;
    let newer = body.find("Newer").unwrap();
    let older = body.find("Older").unwrap();
    assert!(newer < older);
}
