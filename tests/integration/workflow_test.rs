//! Workflow orchestration through the HTTP API

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{actor_request, create_item, internal_request, parse_body, TestApp};

async fn pending_item(app: &TestApp) -> String {
    let item = create_item(app, "owner-1", "Red Jacket").await;
    let id = item["id"].as_str().unwrap().to_string();
    common::submit_item(app, "owner-1", &id).await;
    id
}

async fn start_workflow(app: &TestApp, id: &str, kind: &str) -> (StatusCode, serde_json::Value) {
    let resp = app
        .send(actor_request(
            Method::POST,
            &format!("/v1/closet/{id}/workflows"),
            "owner-1",
            false,
            Some(json!({"kind": kind})),
        ))
        .await;
    let status = resp.status();
    (status, parse_body(resp).await)
}

#[tokio::test]
async fn test_double_start_yields_already_active() {
    let app = TestApp::new();
    let id = pending_item(&app).await;

    let (status, _) = start_workflow(&app, &id, "APPROVAL").await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, body) = start_workflow(&app, &id, "APPROVAL").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "WORKFLOW_ALREADY_ACTIVE");

    // Only one start reached the engine
    assert_eq!(app.engine.recorded_starts().len(), 1);
}

#[tokio::test]
async fn test_start_failure_returns_502_and_releases_lock() {
    let app = TestApp::new();
    let id = pending_item(&app).await;

    app.engine.fail_next_start();
    let (status, body) = start_workflow(&app, &id, "APPROVAL").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "WORKFLOW_START_FAILED");

    // The lock was released; a retry succeeds
    let (status, _) = start_workflow(&app, &id, "APPROVAL").await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_approval_workflow_completion_approves_item() {
    let app = TestApp::new();
    let id = pending_item(&app).await;

    let (_, execution) = start_workflow(&app, &id, "APPROVAL").await;
    let execution_ref = execution["execution_ref"].as_str().unwrap();

    let resp = app
        .send(internal_request(
            Method::POST,
            "/internal/workflows/callback",
            Some(json!({"execution_ref": execution_ref, "outcome": "SUCCEEDED"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body["outcome"], "SUCCEEDED");
    assert!(!body["completed_at"].is_null());

    let resp = app
        .send(actor_request(
            Method::GET,
            &format!("/v1/closet/{id}"),
            "owner-1",
            false,
            None,
        ))
        .await;
    assert_eq!(parse_body(resp).await["status"], "APPROVED");
}

#[tokio::test]
async fn test_callback_replay_is_idempotent() {
    let app = TestApp::new();
    let id = pending_item(&app).await;

    let (_, execution) = start_workflow(&app, &id, "APPROVAL").await;
    let execution_ref = execution["execution_ref"].as_str().unwrap().to_string();

    let payload = json!({"execution_ref": execution_ref, "outcome": "SUCCEEDED"});
    let resp = app
        .send(internal_request(
            Method::POST,
            "/internal/workflows/callback",
            Some(payload.clone()),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Redelivery returns the stored record and changes nothing
    let resp = app
        .send(internal_request(
            Method::POST,
            "/internal/workflows/callback",
            Some(json!({"execution_ref": execution_ref, "outcome": "FAILED"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(parse_body(resp).await["outcome"], "SUCCEEDED");

    let resp = app
        .send(actor_request(
            Method::GET,
            &format!("/v1/closet/{id}"),
            "owner-1",
            false,
            None,
        ))
        .await;
    assert_eq!(parse_body(resp).await["status"], "APPROVED");
}

#[tokio::test]
async fn test_unknown_execution_ref_is_404() {
    let app = TestApp::new();
    let resp = app
        .send(internal_request(
            Method::POST,
            "/internal/workflows/callback",
            Some(json!({"execution_ref": "exec-missing", "outcome": "SUCCEEDED"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_executions_for_item() {
    let app = TestApp::new();
    let id = pending_item(&app).await;

    let (_, execution) = start_workflow(&app, &id, "APPROVAL").await;
    let execution_ref = execution["execution_ref"].as_str().unwrap();
    app.send(internal_request(
        Method::POST,
        "/internal/workflows/callback",
        Some(json!({"execution_ref": execution_ref, "outcome": "SUCCEEDED"})),
    ))
    .await;
    start_workflow(&app, &id, "BACKGROUND_CHANGE").await;

    let resp = app
        .send(actor_request(
            Method::GET,
            &format!("/v1/closet/{id}/workflows"),
            "owner-1",
            false,
            None,
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let executions = parse_body(resp).await;
    assert_eq!(executions.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_stranger_cannot_start_workflow() {
    let app = TestApp::new();
    let id = pending_item(&app).await;

    let resp = app
        .send(actor_request(
            Method::POST,
            &format!("/v1/closet/{id}/workflows"),
            "stranger",
            false,
            Some(json!({"kind": "APPROVAL"})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(app.engine.recorded_starts().is_empty());
}
