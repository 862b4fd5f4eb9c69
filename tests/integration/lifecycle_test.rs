//! End-to-end item lifecycle through the HTTP API

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{actor_request, create_item, internal_request, parse_body, TestApp};

#[tokio::test]
async fn test_full_lifecycle_draft_to_published() {
    let app = TestApp::new();

    // Owner creates a draft
    let item = create_item(&app, "owner-1", "Red Jacket").await;
    let id = item["id"].as_str().unwrap().to_string();
    assert_eq!(item["status"], "DRAFT");
    assert_eq!(item["audience"], "PUBLIC");
    assert_eq!(item["ready_for_review"], false);

    // Worker reports the processed cutout
    let resp = app
        .send(internal_request(
            Method::POST,
            "/internal/media/processed",
            Some(json!({"item_id": id, "media_key": "processed/red-jacket.png"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body["ready_for_review"], true);

    // Owner submits for review
    let resp = app
        .send(actor_request(
            Method::POST,
            &format!("/v1/closet/{id}/submit"),
            "owner-1",
            false,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(parse_body(resp).await["status"], "PENDING");

    // Moderator approves
    let resp = app
        .send(actor_request(
            Method::POST,
            &format!("/v1/closet/{id}/approve"),
            "mod-1",
            true,
            Some(json!({})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(parse_body(resp).await["status"], "APPROVED");

    // Story publish workflow runs and succeeds
    let resp = app
        .send(actor_request(
            Method::POST,
            &format!("/v1/closet/{id}/workflows"),
            "mod-1",
            true,
            Some(json!({"kind": "STORY_PUBLISH"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let execution = parse_body(resp).await;
    let execution_ref = execution["execution_ref"].as_str().unwrap().to_string();

    let resp = app
        .send(internal_request(
            Method::POST,
            "/internal/workflows/callback",
            Some(json!({"execution_ref": execution_ref, "outcome": "SUCCEEDED"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The item is now live and visible in the public feed
    let resp = app
        .send(actor_request(
            Method::GET,
            &format!("/v1/closet/{id}"),
            "someone-else",
            false,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(parse_body(resp).await["status"], "PUBLISHED");

    let resp = app
        .send(actor_request(Method::GET, "/v1/feed", "anyone", false, None))
        .await;
    let feed = parse_body(resp).await;
    assert_eq!(feed["items"].as_array().unwrap().len(), 1);
    assert_eq!(feed["items"][0]["id"], id.as_str());
}

#[tokio::test]
async fn test_reject_then_approve_fails() {
    let app = TestApp::new();
    let item = create_item(&app, "owner-1", "Blurry Coat").await;
    let id = item["id"].as_str().unwrap().to_string();
    common::submit_item(&app, "owner-1", &id).await;

    let resp = app
        .send(actor_request(
            Method::POST,
            &format!("/v1/closet/{id}/reject"),
            "mod-1",
            true,
            Some(json!({"reason": "photo too blurry"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body["status"], "REJECTED");
    assert_eq!(body["moderation_reason"], "photo too blurry");

    // Approving a rejected item is an invalid transition
    let resp = app
        .send(actor_request(
            Method::POST,
            &format!("/v1/closet/{id}/approve"),
            "mod-1",
            true,
            Some(json!({})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = parse_body(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_non_moderator_cannot_approve() {
    let app = TestApp::new();
    let item = create_item(&app, "owner-1", "Green Scarf").await;
    let id = item["id"].as_str().unwrap().to_string();
    common::submit_item(&app, "owner-1", &id).await;

    let resp = app
        .send(actor_request(
            Method::POST,
            &format!("/v1/closet/{id}/approve"),
            "owner-1",
            false,
            Some(json!({})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(parse_body(resp).await["error"]["code"], "AUTHORIZATION_ERROR");
}

#[tokio::test]
async fn test_missing_identity_header_rejected() {
    let app = TestApp::new();
    let resp = app
        .send(internal_request(Method::GET, "/v1/closet", None))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_soft_delete_and_restore() {
    let app = TestApp::new();
    let id = common::published_item(&app, "owner-1", "Denim Vest").await;

    let resp = app
        .send(actor_request(
            Method::POST,
            &format!("/v1/closet/{id}/soft-delete"),
            "mod-1",
            true,
            Some(json!({"reason": "copyright claim"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(parse_body(resp).await["status"], "SOFT_DELETED");

    // Hidden from the public feed
    let resp = app
        .send(actor_request(Method::GET, "/v1/feed", "anyone", false, None))
        .await;
    assert!(parse_body(resp).await["items"].as_array().unwrap().is_empty());

    // Restore returns it to PUBLISHED
    let resp = app
        .send(actor_request(
            Method::POST,
            &format!("/v1/closet/{id}/restore"),
            "mod-1",
            true,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body["status"], "PUBLISHED");
    assert!(body["moderation_reason"].is_null());
}

#[tokio::test]
async fn test_create_item_validation() {
    let app = TestApp::new();

    // Empty title fails validation
    let resp = app
        .send(actor_request(
            Method::POST,
            "/v1/closet",
            "owner-1",
            false,
            Some(json!({"title": "", "raw_media_key": "uploads/raw/x.jpg", "category": "hats"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Negative coin value fails validation
    let resp = app
        .send(actor_request(
            Method::POST,
            "/v1/closet",
            "owner-1",
            false,
            Some(json!({
                "title": "Top Hat",
                "raw_media_key": "uploads/raw/top-hat.jpg",
                "category": "hats",
                "coin_value": -5,
            })),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_owner_only_visibility_before_publish() {
    let app = TestApp::new();
    let item = create_item(&app, "owner-1", "Private Cape").await;
    let id = item["id"].as_str().unwrap();

    let resp = app
        .send(actor_request(
            Method::GET,
            &format!("/v1/closet/{id}"),
            "stranger",
            false,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .send(actor_request(
            Method::GET,
            &format!("/v1/closet/{id}"),
            "mod-1",
            true,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}
