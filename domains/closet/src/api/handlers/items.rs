//! Item lifecycle and listing API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use wardrobe_common::{ActorContext, PageParams, Result, ValidatedJson};

use crate::api::middleware::ClosetState;
use crate::domain::entities::{
    Audience, ContentItem, ItemStatus, WorkflowExecution, WorkflowKind, WorkflowOutcome,
};
use crate::repository::ItemPage;
use crate::service::NewItem;

/// Item response DTO
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub owner_sub: String,
    pub title: String,
    pub raw_media_key: String,
    pub media_key: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub tags: Vec<String>,
    pub coin_value: Option<i32>,
    pub status: ItemStatus,
    pub audience: Audience,
    pub moderation_reason: Option<String>,
    pub ready_for_review: bool,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContentItem> for ItemResponse {
    fn from(item: ContentItem) -> Self {
        let ready_for_review = item.is_ready_for_review();
        Self {
            id: item.id,
            owner_sub: item.owner_sub,
            title: item.title,
            raw_media_key: item.raw_media_key,
            media_key: item.media_key,
            category: item.category,
            subcategory: item.subcategory,
            tags: item.tags,
            coin_value: item.coin_value,
            status: item.status,
            audience: item.audience,
            moderation_reason: item.moderation_reason,
            ready_for_review,
            like_count: item.like_count,
            comment_count: item.comment_count,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// One page of items with an opaque continuation token
#[derive(Debug, Serialize)]
pub struct ItemPageResponse {
    pub items: Vec<ItemResponse>,
    pub next_cursor: Option<String>,
}

impl From<ItemPage> for ItemPageResponse {
    fn from(page: ItemPage) -> Self {
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            next_cursor: page.next_cursor,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 1024))]
    pub raw_media_key: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub subcategory: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(range(min = 0))]
    pub coin_value: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct StartWorkflowRequest {
    pub kind: WorkflowKind,
    #[serde(default)]
    pub input: Option<serde_json::Value>,
}

/// Workflow execution response DTO
#[derive(Debug, Serialize)]
pub struct ExecutionResponse {
    pub id: Uuid,
    pub item_id: Uuid,
    pub kind: WorkflowKind,
    pub execution_ref: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub outcome: Option<WorkflowOutcome>,
}

impl From<WorkflowExecution> for ExecutionResponse {
    fn from(e: WorkflowExecution) -> Self {
        Self {
            id: e.id,
            item_id: e.item_id,
            kind: e.kind,
            execution_ref: e.execution_ref,
            started_at: e.started_at,
            completed_at: e.completed_at,
            outcome: e.outcome,
        }
    }
}

/// Query parameters for the published feed
#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub audience: Option<Audience>,
    pub cursor: Option<String>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// Create a new draft item owned by the caller
pub async fn create_item(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    ValidatedJson(req): ValidatedJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>)> {
    let item = state
        .moderation
        .create_item(
            &ctx,
            NewItem {
                title: req.title,
                raw_media_key: req.raw_media_key,
                category: req.category,
                subcategory: req.subcategory,
                tags: req.tags,
                coin_value: req.coin_value,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// List the caller's own items across all statuses
pub async fn list_my_items(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Query(page): Query<PageParams>,
) -> Result<Json<ItemPageResponse>> {
    let result = state.queries.my_closet(&ctx, &page).await?;
    Ok(Json(result.into()))
}

/// Fetch a single item
pub async fn get_item(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse>> {
    let item = state.moderation.get_item(&ctx, id).await?;
    Ok(Json(item.into()))
}

/// Owner submits a draft for moderation
pub async fn submit_item(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse>> {
    let item = state.moderation.submit_for_review(&ctx, id).await?;
    Ok(Json(item.into()))
}

/// Start an external workflow for an item
pub async fn start_workflow(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StartWorkflowRequest>,
) -> Result<(StatusCode, Json<ExecutionResponse>)> {
    let execution = state
        .workflows
        .start_workflow(&ctx, id, req.kind, req.input)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(execution.into())))
}

/// Executions recorded for an item, newest first
pub async fn list_workflows(
    ctx: ActorContext,
    State(state): State<ClosetState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ExecutionResponse>>> {
    let executions = state.workflows.list_executions(&ctx, id).await?;
    Ok(Json(executions.into_iter().map(Into::into).collect()))
}

/// Public feed of published items
pub async fn published_feed(
    State(state): State<ClosetState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<ItemPageResponse>> {
    let page = PageParams {
        cursor: params.cursor,
        limit: params.limit,
        search: params.search,
    };
    let result = state.queries.published_feed(params.audience, &page).await?;
    Ok(Json(result.into()))
}
