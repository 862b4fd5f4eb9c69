//! Engagement recording, counters, and bus fan-out through the HTTP API

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{actor_request, create_item, parse_body, published_item, TestApp};

async fn engage(
    app: &TestApp,
    id: &str,
    actor: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let resp = app
        .send(actor_request(
            Method::POST,
            &format!("/v1/closet/{id}/engagement"),
            actor,
            false,
            Some(body),
        ))
        .await;
    let status = resp.status();
    (status, parse_body(resp).await)
}

#[tokio::test]
async fn test_like_round_trip() {
    let app = TestApp::new();
    let id = published_item(&app, "owner-1", "Red Jacket").await;

    let (status, body) = engage(&app, &id, "fan-1", json!({"kind": "LIKE"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["like_count"], 1);

    let events = app.bus.recorded_events();
    assert_eq!(events.last().unwrap().name, "closet/engagement.liked");

    // Remove brings the counter back down and emits a retraction
    let resp = app
        .send(actor_request(
            Method::DELETE,
            &format!("/v1/closet/{id}/engagement/LIKE"),
            "fan-1",
            false,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(parse_body(resp).await["like_count"], 0);
    assert_eq!(
        app.bus.recorded_events().last().unwrap().name,
        "closet/engagement.retracted"
    );
}

#[tokio::test]
async fn test_remove_without_engagement_is_noop() {
    let app = TestApp::new();
    let id = published_item(&app, "owner-1", "Red Jacket").await;

    let resp = app
        .send(actor_request(
            Method::DELETE,
            &format!("/v1/closet/{id}/engagement/LIKE"),
            "fan-1",
            false,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(parse_body(resp).await["like_count"], 0);
    assert!(app.bus.recorded_events().is_empty());
}

#[tokio::test]
async fn test_comment_requires_payload_and_counts() {
    let app = TestApp::new();
    let id = published_item(&app, "owner-1", "Red Jacket").await;

    let (status, _) = engage(&app, &id, "fan-1", json!({"kind": "COMMENT"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = engage(
        &app,
        &id,
        "fan-1",
        json!({"kind": "COMMENT", "payload": "love this jacket"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comment_count"], 1);
    assert_eq!(body["like_count"], 0);
}

#[tokio::test]
async fn test_engagement_only_on_published_items() {
    let app = TestApp::new();
    let item = create_item(&app, "owner-1", "Unreviewed Hat").await;
    let id = item["id"].as_str().unwrap();

    let (status, body) = engage(&app, id, "fan-1", json!({"kind": "LIKE"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_engagement_log_listing() {
    let app = TestApp::new();
    let id = published_item(&app, "owner-1", "Red Jacket").await;

    engage(&app, &id, "fan-1", json!({"kind": "LIKE"})).await;
    engage(&app, &id, "fan-2", json!({"kind": "PIN"})).await;
    engage(
        &app,
        &id,
        "fan-3",
        json!({"kind": "COMMENT", "payload": "stunning"}),
    )
    .await;

    let resp = app
        .send(actor_request(
            Method::GET,
            &format!("/v1/closet/{id}/engagement"),
            "anyone",
            false,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let records = parse_body(resp).await;
    assert_eq!(records.as_array().unwrap().len(), 3);
    // Newest first
    assert_eq!(records[0]["kind"], "COMMENT");
    assert_eq!(records[0]["payload"], "stunning");
}

#[tokio::test]
async fn test_unknown_kind_in_remove_path_rejected() {
    let app = TestApp::new();
    let id = published_item(&app, "owner-1", "Red Jacket").await;

    let resp = app
        .send(actor_request(
            Method::DELETE,
            &format!("/v1/closet/{id}/engagement/WAVE"),
            "fan-1",
            false,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bus_failure_does_not_lose_engagement() {
    let app = TestApp::new();
    let id = published_item(&app, "owner-1", "Red Jacket").await;

    app.bus.fail_next_publish();
    let (status, body) = engage(&app, &id, "fan-1", json!({"kind": "LIKE"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["like_count"], 1);
}
