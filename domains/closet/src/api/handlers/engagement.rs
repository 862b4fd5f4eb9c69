//! Engagement API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wardrobe_common::{ActorContext, Error, Result};

use super::items::ItemResponse;
use crate::api::middleware::ClosetState;
use crate::domain::entities::{EngagementKind, EngagementRecord};

#[derive(Debug, Deserialize)]
pub struct RecordEngagementRequest {
    pub kind: EngagementKind,
    /// Comment text when kind is COMMENT
    pub payload: Option<String>,
}

/// Engagement record DTO
#[derive(Debug, Serialize)]
pub struct EngagementResponse {
    pub id: Uuid,
    pub item_id: Uuid,
    pub actor_sub: String,
    pub kind: EngagementKind,
    pub payload: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<EngagementRecord> for EngagementResponse {
    fn from(r: EngagementRecord) -> Self {
        Self {
            id: r.id,
            item_id: r.item_id,
            actor_sub: r.actor_sub,
            kind: r.kind,
            payload: r.payload,
            created_at: r.created_at,
        }
    }
}

/// Record one engagement action; returns the item with fresh counters
pub async fn record_engagement(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordEngagementRequest>,
) -> Result<(StatusCode, Json<ItemResponse>)> {
    let item = state
        .engagement
        .record(&ctx, id, req.kind, req.payload)
        .await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// Remove the caller's engagement of one kind (idempotent)
pub async fn remove_engagement(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path((id, kind)): Path<(Uuid, String)>,
) -> Result<Json<ItemResponse>> {
    let kind = parse_kind(&kind)?;
    let item = state.engagement.remove(&ctx, id, kind).await?;
    Ok(Json(item.into()))
}

/// Engagement log for an item, newest first
pub async fn list_engagements(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<EngagementResponse>>> {
    let records = state.engagement.list(&ctx, id).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

fn parse_kind(raw: &str) -> Result<EngagementKind> {
    match raw {
        "LIKE" => Ok(EngagementKind::Like),
        "COMMENT" => Ok(EngagementKind::Comment),
        "PIN" => Ok(EngagementKind::Pin),
        "SHARE" => Ok(EngagementKind::Share),
        other => Err(Error::Validation(format!(
            "Unknown engagement kind: {other}"
        ))),
    }
}
