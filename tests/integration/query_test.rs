//! Listing, feed, moderation queue, and pagination through the HTTP API

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{actor_request, create_item, parse_body, published_item, TestApp};

#[tokio::test]
async fn test_my_closet_lists_only_own_items() {
    let app = TestApp::new();
    create_item(&app, "owner-1", "Jacket").await;
    create_item(&app, "owner-1", "Boots").await;
    create_item(&app, "owner-2", "Scarf").await;

    let resp = app
        .send(actor_request(Method::GET, "/v1/closet", "owner-1", false, None))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i["owner_sub"] == "owner-1"));
}

#[tokio::test]
async fn test_feed_pagination_walks_all_items_once() {
    let app = TestApp::new();
    for i in 0..7 {
        published_item(&app, "owner-1", &format!("Item {i}")).await;
    }

    let mut seen = Vec::new();
    let mut uri = "/v1/feed?limit=3".to_string();
    loop {
        let resp = app
            .send(actor_request(Method::GET, &uri, "anyone", false, None))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        for item in body["items"].as_array().unwrap() {
            seen.push(item["id"].as_str().unwrap().to_string());
        }
        match body["next_cursor"].as_str() {
            Some(cursor) => uri = format!("/v1/feed?limit=3&cursor={cursor}"),
            None => break,
        }
    }

    assert_eq!(seen.len(), 7);
    let unique: std::collections::HashSet<_> = seen.iter().collect();
    assert_eq!(unique.len(), 7);
}

#[tokio::test]
async fn test_malformed_cursor_is_400() {
    let app = TestApp::new();
    let resp = app
        .send(actor_request(
            Method::GET,
            "/v1/feed?cursor=garbage",
            "anyone",
            false,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(resp).await["error"]["code"], "INVALID_CURSOR");
}

#[tokio::test]
async fn test_moderation_queue_requires_moderator() {
    let app = TestApp::new();
    let item = create_item(&app, "owner-1", "Jacket").await;
    let id = item["id"].as_str().unwrap().to_string();
    common::submit_item(&app, "owner-1", &id).await;

    let resp = app
        .send(actor_request(
            Method::GET,
            "/v1/moderation/queue",
            "owner-1",
            false,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .send(actor_request(
            Method::GET,
            "/v1/moderation/queue",
            "mod-1",
            true,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["status"], "PENDING");
}

#[tokio::test]
async fn test_feed_audience_filter() {
    let app = TestApp::new();
    let public_id = published_item(&app, "owner-1", "Public Jacket").await;
    let besties_id = published_item(&app, "owner-2", "Besties Boots").await;

    let resp = app
        .send(actor_request(
            Method::POST,
            &format!("/v1/closet/{besties_id}/audience"),
            "mod-1",
            true,
            Some(json!({"audience": "BESTIES"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .send(actor_request(
            Method::GET,
            "/v1/feed?audience=BESTIES",
            "anyone",
            false,
            None,
        ))
        .await;
    let body = parse_body(resp).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], besties_id.as_str());

    let resp = app
        .send(actor_request(
            Method::GET,
            "/v1/feed?audience=PUBLIC",
            "anyone",
            false,
            None,
        ))
        .await;
    let items = parse_body(resp).await;
    assert_eq!(items["items"][0]["id"], public_id.as_str());
}

#[tokio::test]
async fn test_title_search() {
    let app = TestApp::new();
    published_item(&app, "owner-1", "Red Jacket").await;
    published_item(&app, "owner-2", "Blue Boots").await;

    let resp = app
        .send(actor_request(
            Method::GET,
            "/v1/feed?search=jacket",
            "anyone",
            false,
            None,
        ))
        .await;
    let body = parse_body(resp).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Red Jacket");
}

#[tokio::test]
async fn test_feed_hides_unpublished_items() {
    let app = TestApp::new();
    create_item(&app, "owner-1", "Draft Hat").await;
    let pending = create_item(&app, "owner-1", "Pending Hat").await;
    common::submit_item(&app, "owner-1", pending["id"].as_str().unwrap()).await;

    let resp = app
        .send(actor_request(Method::GET, "/v1/feed", "anyone", false, None))
        .await;
    assert!(parse_body(resp).await["items"].as_array().unwrap().is_empty());
}
