//! Shared harness for closet API integration tests
//!
//! Builds the closet router over the in-memory store with mock workflow
//! engine and event bus, and provides request/response helpers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use wardrobe_closet::{ClosetState, MemoryItemStore};
use wardrobe_events::mock::MockEventBus;
use wardrobe_workflow::mock::MockWorkflowEngine;

pub struct TestApp {
    pub store: Arc<MemoryItemStore>,
    pub engine: Arc<MockWorkflowEngine>,
    pub bus: Arc<MockEventBus>,
    state: ClosetState,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryItemStore::new());
        let engine = Arc::new(MockWorkflowEngine::new());
        let bus = Arc::new(MockEventBus::new());
        let state = ClosetState::new(store.clone(), engine.clone(), bus.clone());
        Self {
            store,
            engine,
            bus,
            state,
        }
    }

    pub fn router(&self) -> Router {
        wardrobe_closet::routes().with_state(self.state.clone())
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router().oneshot(req).await.unwrap()
    }
}

/// Build a request carrying actor identity headers
pub fn actor_request(
    method: Method,
    uri: &str,
    sub: &str,
    moderator: bool,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-actor-sub", sub);
    if moderator {
        builder = builder.header("x-actor-moderator", "true");
    }

    if let Some(b) = body {
        builder = builder.header("content-type", "application/json");
        builder
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Build a request with no identity headers (internal callbacks)
pub fn internal_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(b) = body {
        builder = builder.header("content-type", "application/json");
        builder
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Parse a response body as JSON
pub async fn parse_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Create a draft item through the API; returns its parsed body
pub async fn create_item(app: &TestApp, owner: &str, title: &str) -> Value {
    let req = actor_request(
        Method::POST,
        "/v1/closet",
        owner,
        false,
        Some(serde_json::json!({
            "title": title,
            "raw_media_key": format!("uploads/raw/{}.jpg", title.to_lowercase().replace(' ', "-")),
            "category": "outerwear",
        })),
    );
    let resp = app.send(req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    parse_body(resp).await
}

/// Drive an item from DRAFT to the given point in the lifecycle via the API
pub async fn submit_item(app: &TestApp, owner: &str, id: &str) {
    let req = actor_request(
        Method::POST,
        &format!("/v1/closet/{id}/submit"),
        owner,
        false,
        None,
    );
    let resp = app.send(req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

pub async fn approve_item(app: &TestApp, id: &str) {
    let req = actor_request(
        Method::POST,
        &format!("/v1/closet/{id}/approve"),
        "mod-1",
        true,
        Some(serde_json::json!({})),
    );
    let resp = app.send(req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

pub async fn publish_item(app: &TestApp, id: &str) {
    let req = actor_request(
        Method::POST,
        &format!("/v1/closet/{id}/publish"),
        "mod-1",
        true,
        None,
    );
    let resp = app.send(req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

/// Create + submit + approve + publish
pub async fn published_item(app: &TestApp, owner: &str, title: &str) -> String {
    let item = create_item(app, owner, title).await;
    let id = item["id"].as_str().unwrap().to_string();
    submit_item(app, owner, &id).await;
    approve_item(app, &id).await;
    publish_item(app, &id).await;
    id
}
