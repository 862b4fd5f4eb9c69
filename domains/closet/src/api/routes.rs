//! Route definitions for the closet domain API

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{admin, callbacks, engagement, items};
use super::middleware::ClosetState;

/// Create all closet domain API routes
pub fn routes() -> Router<ClosetState> {
    Router::new()
        .route("/v1/closet", post(items::create_item).get(items::list_my_items))
        .route("/v1/closet/{id}", get(items::get_item))
        .route("/v1/closet/{id}/submit", post(items::submit_item))
        .route("/v1/closet/{id}/approve", post(admin::approve_item))
        .route("/v1/closet/{id}/reject", post(admin::reject_item))
        .route("/v1/closet/{id}/audience", post(admin::set_audience))
        .route("/v1/closet/{id}/publish", post(admin::publish_item))
        .route("/v1/closet/{id}/soft-delete", post(admin::soft_delete_item))
        .route("/v1/closet/{id}/restore", post(admin::restore_item))
        .route(
            "/v1/closet/{id}/workflows",
            post(items::start_workflow).get(items::list_workflows),
        )
        .route(
            "/v1/closet/{id}/engagement",
            post(engagement::record_engagement).get(engagement::list_engagements),
        )
        .route(
            "/v1/closet/{id}/engagement/{kind}",
            delete(engagement::remove_engagement),
        )
        .route("/v1/feed", get(items::published_feed))
        .route("/v1/moderation/queue", get(admin::moderation_queue))
        .route(
            "/internal/workflows/callback",
            post(callbacks::workflow_callback),
        )
        .route("/internal/media/processed", post(callbacks::media_processed))
}
