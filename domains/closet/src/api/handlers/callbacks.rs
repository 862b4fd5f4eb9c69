//! Internal callback handlers for the workflow engine and media worker
//!
//! These routes sit behind the deployment's network boundary and carry no
//! actor identity; both are idempotent under redelivery.

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use wardrobe_common::Result;

use super::items::{ExecutionResponse, ItemResponse};
use crate::api::middleware::ClosetState;
use crate::domain::entities::WorkflowOutcome;

/// Completion callback payload from the workflow engine
#[derive(Debug, Deserialize)]
pub struct WorkflowCallbackPayload {
    pub execution_ref: String,
    pub outcome: WorkflowOutcome,
}

/// Write-back payload from the media processing worker
#[derive(Debug, Deserialize)]
pub struct MediaProcessedPayload {
    pub item_id: Uuid,
    pub media_key: String,
}

/// Handle workflow completion from the engine
pub async fn workflow_callback(
    State(state): State<ClosetState>,
    Json(payload): Json<WorkflowCallbackPayload>,
) -> Result<Json<ExecutionResponse>> {
    let execution = state
        .workflows
        .report_completion(&payload.execution_ref, payload.outcome)
        .await?;
    Ok(Json(execution.into()))
}

/// Handle processed-media write-back from the worker
pub async fn media_processed(
    State(state): State<ClosetState>,
    Json(payload): Json<MediaProcessedPayload>,
) -> Result<Json<ItemResponse>> {
    let item = state
        .processing
        .attach_cutout(payload.item_id, &payload.media_key)
        .await?;
    Ok(Json(item.into()))
}
