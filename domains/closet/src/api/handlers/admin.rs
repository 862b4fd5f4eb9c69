//! Moderation API handlers
//!
//! Every mutating route here is moderator-only; the services enforce that,
//! these handlers just shape requests and responses.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use wardrobe_common::{ActorContext, PageParams, Result, ValidatedJson};

use super::items::{ItemPageResponse, ItemResponse};
use crate::api::middleware::ClosetState;
use crate::domain::entities::Audience;

#[derive(Debug, Deserialize, Default)]
pub struct ApproveRequest {
    /// Overrides the item's audience when present
    pub audience: Option<Audience>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(min = 1, max = 1000))]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct SetAudienceRequest {
    pub audience: Audience,
}

#[derive(Debug, Deserialize, Default)]
pub struct SoftDeleteRequest {
    pub reason: Option<String>,
}

/// Approve a pending item
pub async fn approve_item(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
    req: Option<Json<ApproveRequest>>,
) -> Result<Json<ItemResponse>> {
    let audience = req.and_then(|Json(r)| r.audience);
    let item = state.moderation.approve(&ctx, id, audience).await?;
    Ok(Json(item.into()))
}

/// Reject a pending item with a reason
pub async fn reject_item(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<RejectRequest>,
) -> Result<Json<ItemResponse>> {
    let item = state.moderation.reject(&ctx, id, req.reason).await?;
    Ok(Json(item.into()))
}

/// Change an item's audience without touching its status
pub async fn set_audience(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetAudienceRequest>,
) -> Result<Json<ItemResponse>> {
    let item = state.moderation.set_audience(&ctx, id, req.audience).await?;
    Ok(Json(item.into()))
}

/// Take an approved item live
pub async fn publish_item(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse>> {
    let item = state.moderation.publish(&ctx, id).await?;
    Ok(Json(item.into()))
}

/// Hide an item, keeping it restorable
pub async fn soft_delete_item(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
    req: Option<Json<SoftDeleteRequest>>,
) -> Result<Json<ItemResponse>> {
    let reason = req.and_then(|Json(r)| r.reason);
    let item = state.moderation.soft_delete(&ctx, id, reason).await?;
    Ok(Json(item.into()))
}

/// Return a soft-deleted item to its prior status
pub async fn restore_item(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse>> {
    let item = state.moderation.restore(&ctx, id).await?;
    Ok(Json(item.into()))
}

/// Items awaiting moderation, newest first
pub async fn moderation_queue(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Query(page): Query<PageParams>,
) -> Result<Json<ItemPageResponse>> {
    let result = state.queries.moderation_queue(&ctx, &page).await?;
    Ok(Json(result.into()))
}
