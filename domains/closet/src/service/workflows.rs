//! Workflow orchestration: starting external executions and reconciling
//! item state when the engine reports completion.
//!
//! The execution record doubles as the per-(item, kind) activity lock: the
//! conditional insert in the store rejects a second start while one is
//! active. A failed engine handshake compensates by deleting the record, so
//! a start failure never leaves the lock held.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use wardrobe_common::{ActorContext, Error, Result};
use wardrobe_workflow::{StartRequest, WorkflowEngine};

use crate::domain::entities::{
    ContentItem, ItemStatus, WorkflowExecution, WorkflowKind, WorkflowOutcome,
};
use crate::repository::ItemStore;

#[derive(Clone)]
pub struct WorkflowOrchestrator {
    store: Arc<dyn ItemStore>,
    engine: Arc<dyn WorkflowEngine>,
}

impl WorkflowOrchestrator {
    pub fn new(store: Arc<dyn ItemStore>, engine: Arc<dyn WorkflowEngine>) -> Self {
        Self { store, engine }
    }

    /// Start an external workflow for an item
    ///
    /// Record-then-start: the execution record is inserted first (acquiring
    /// the activity lock), then the engine handshake runs. On handshake
    /// failure the record is deleted and the caller gets
    /// `WorkflowStartFailed` so a retry can acquire the lock fresh.
    pub async fn start_workflow(
        &self,
        ctx: &ActorContext,
        item_id: Uuid,
        kind: WorkflowKind,
        input: Option<serde_json::Value>,
    ) -> Result<WorkflowExecution> {
        let item = self.store.get_item(item_id).await?;
        ctx.require_owner_or_moderator(&item.owner_sub)?;

        let mut execution = WorkflowExecution::new(item_id, kind);
        self.store.create_execution(&execution).await?;

        let mut payload = json!({
            "item_id": item_id,
            "owner_sub": item.owner_sub,
            "status": item.status,
            "raw_media_key": item.raw_media_key,
            "media_key": item.media_key,
        });
        if let Some(extra) = input {
            // Caller-supplied parameters ride alongside the item snapshot
            payload["parameters"] = extra;
        }
        let request = StartRequest {
            workflow: kind.workflow_name().to_string(),
            input: payload,
        };

        match self.engine.start(request).await {
            Ok(response) => {
                self.store
                    .bind_execution_ref(execution.id, &response.execution_ref)
                    .await?;
                execution.execution_ref = Some(response.execution_ref);
                tracing::info!(
                    item_id = %item_id,
                    kind = %kind,
                    execution_ref = execution.execution_ref.as_deref().unwrap_or(""),
                    "Workflow started"
                );
                Ok(execution)
            }
            Err(e) => {
                // Release the activity lock before surfacing the failure
                if let Err(cleanup) = self.store.delete_execution(execution.id).await {
                    tracing::error!(
                        execution_id = %execution.id,
                        error = %cleanup,
                        "Failed to delete execution record after start failure"
                    );
                }
                tracing::warn!(item_id = %item_id, kind = %kind, error = %e, "Workflow start failed");
                Err(Error::WorkflowStartFailed(e.to_string()))
            }
        }
    }

    /// Engine callback: record the outcome and reconcile the item's status
    ///
    /// Replays are absorbed against the stored record, but the reconcile
    /// still runs: the execution may have been marked completed while the
    /// item write failed, and the retry has to converge the item. Reconcile
    /// is status-guarded, so on a true replay it is a no-op.
    pub async fn report_completion(
        &self,
        execution_ref: &str,
        outcome: WorkflowOutcome,
    ) -> Result<WorkflowExecution> {
        let execution = self.store.find_execution_by_ref(execution_ref).await?;
        if !execution.is_active() {
            let stored = execution.outcome.unwrap_or(outcome);
            tracing::debug!(execution_ref, "Completion replay; re-running reconcile");
            self.reconcile(&execution, stored).await?;
            return Ok(execution);
        }

        let completed = self.store.complete_execution(execution.id, outcome).await?;
        tracing::info!(
            execution_ref,
            item_id = %completed.item_id,
            kind = %completed.kind,
            outcome = ?outcome,
            "Workflow completed"
        );

        self.reconcile(&completed, outcome).await?;
        Ok(completed)
    }

    /// All executions recorded for an item, newest first
    pub async fn list_executions(
        &self,
        ctx: &ActorContext,
        item_id: Uuid,
    ) -> Result<Vec<WorkflowExecution>> {
        let item = self.store.get_item(item_id).await?;
        ctx.require_owner_or_moderator(&item.owner_sub)?;
        self.store.list_executions(item_id).await
    }

    /// Drive the item forward (or back) based on what the workflow decided
    async fn reconcile(
        &self,
        execution: &WorkflowExecution,
        outcome: WorkflowOutcome,
    ) -> Result<()> {
        let item = match self.store.get_item(execution.item_id).await {
            Ok(item) => item,
            Err(Error::NotFound(_)) => {
                tracing::warn!(item_id = %execution.item_id, "Item gone at reconcile time");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        match (execution.kind, outcome) {
            (WorkflowKind::Approval, WorkflowOutcome::Succeeded) => {
                self.reconcile_transition(item, ItemStatus::Pending, |item| item.approve(None))
                    .await
            }
            (WorkflowKind::Approval, WorkflowOutcome::Failed) => {
                // Stays in the review queue; the reason tells the moderator
                // why automation punted
                self.reconcile_transition(item, ItemStatus::Pending, |item| {
                    item.moderation_reason =
                        Some("automated approval workflow failed".to_string());
                    item.updated_at = chrono::Utc::now();
                    Ok(())
                })
                .await
            }
            (WorkflowKind::StoryPublish, WorkflowOutcome::Succeeded) => {
                self.reconcile_transition(item, ItemStatus::Approved, |item| item.publish())
                    .await
            }
            (WorkflowKind::StoryPublish, WorkflowOutcome::Failed) => {
                // Compensating move: back to the review queue with a reason
                self.reconcile_compensate(item).await
            }
            // Background change only records its outcome; the worker writes
            // the processed media back through its own endpoint
            (WorkflowKind::BackgroundChange, _) => Ok(()),
        }
    }

    async fn reconcile_transition<F>(
        &self,
        item: ContentItem,
        expected: ItemStatus,
        apply: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut ContentItem) -> Result<()>,
    {
        if item.status != expected {
            tracing::warn!(
                item_id = %item.id,
                status = %item.status,
                "Item moved before workflow completion; skipping reconcile"
            );
            return Ok(());
        }
        let mut next = item;
        apply(&mut next)?;
        match self.store.update_item_if_status(expected, &next).await {
            Ok(_) => Ok(()),
            Err(Error::Conflict(_)) => {
                tracing::warn!(item_id = %next.id, "Lost reconcile race; skipping");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Story publish failed after approval: send the item back to PENDING so
    /// a moderator re-reviews it. This write bypasses the moderator state
    /// table (Approved -> Pending is not a user-facing transition).
    async fn reconcile_compensate(&self, item: ContentItem) -> Result<()> {
        if item.status != ItemStatus::Approved {
            tracing::warn!(
                item_id = %item.id,
                status = %item.status,
                "Item moved before workflow completion; skipping reconcile"
            );
            return Ok(());
        }
        let mut next = item;
        next.status = ItemStatus::Pending;
        next.moderation_reason = Some("story publish workflow failed".to_string());
        next.updated_at = chrono::Utc::now();
        match self
            .store
            .update_item_if_status(ItemStatus::Approved, &next)
            .await
        {
            Ok(_) => Ok(()),
            Err(Error::Conflict(_)) => {
                tracing::warn!(item_id = %next.id, "Lost reconcile race; skipping");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
