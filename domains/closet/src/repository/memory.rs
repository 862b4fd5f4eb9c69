//! In-process item store
//!
//! The default provider for local development and the backend for the test
//! suite. All state sits behind a single mutex, which makes every operation
//! atomic with respect to concurrent readers, and makes the conditional
//! write a genuine compare-and-swap.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use wardrobe_common::{Cursor, Error, Result};

use crate::domain::entities::{
    ContentItem, Counter, EngagementKind, EngagementRecord, ItemStatus, WorkflowExecution,
    WorkflowOutcome,
};
use crate::repository::{ItemFilter, ItemPage, ItemStore};

#[derive(Debug, Default)]
struct Inner {
    items: HashMap<Uuid, ContentItem>,
    executions: HashMap<Uuid, WorkflowExecution>,
    engagements: Vec<EngagementRecord>,
}

/// Memory-backed implementation of [`ItemStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryItemStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| Error::Internal(format!("store lock poisoned: {e}")))
    }

    fn matches(filter: &ItemFilter, item: &ContentItem) -> bool {
        if let Some(owner) = &filter.owner_sub {
            if &item.owner_sub != owner {
                return false;
            }
        }
        if let Some(status) = filter.status {
            if item.status != status {
                return false;
            }
        }
        if let Some(audience) = filter.audience {
            if item.audience != audience {
                return false;
            }
        }
        if let Some(search) = &filter.search {
            if !item
                .title
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn put_item(&self, item: &ContentItem) -> Result<()> {
        self.lock()?.items.insert(item.id, item.clone());
        Ok(())
    }

    async fn get_item(&self, id: Uuid) -> Result<ContentItem> {
        self.lock()?
            .items
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Item {id} not found")))
    }

    async fn update_item_if_status(
        &self,
        expected: ItemStatus,
        item: &ContentItem,
    ) -> Result<ContentItem> {
        let mut inner = self.lock()?;
        let stored = inner
            .items
            .get_mut(&item.id)
            .ok_or_else(|| Error::NotFound(format!("Item {} not found", item.id)))?;
        if stored.status != expected {
            return Err(Error::Conflict(format!(
                "Item {} is {} (expected {})",
                item.id, stored.status, expected
            )));
        }
        *stored = item.clone();
        Ok(stored.clone())
    }

    async fn update_item(&self, item: &ContentItem) -> Result<ContentItem> {
        let mut inner = self.lock()?;
        let stored = inner
            .items
            .get_mut(&item.id)
            .ok_or_else(|| Error::NotFound(format!("Item {} not found", item.id)))?;
        *stored = item.clone();
        Ok(stored.clone())
    }

    async fn adjust_counter(&self, id: Uuid, counter: Counter, delta: i64) -> Result<i64> {
        let mut inner = self.lock()?;
        let stored = inner
            .items
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Item {id} not found")))?;
        let slot = match counter {
            Counter::Like => &mut stored.like_count,
            Counter::Comment => &mut stored.comment_count,
        };
        *slot = (*slot + delta).max(0);
        stored.updated_at = chrono::Utc::now();
        Ok(*slot)
    }

    async fn query_items(
        &self,
        filter: &ItemFilter,
        cursor: Option<Cursor>,
        limit: usize,
    ) -> Result<ItemPage> {
        let inner = self.lock()?;
        let mut matched: Vec<&ContentItem> = inner
            .items
            .values()
            .filter(|item| Self::matches(filter, item))
            .collect();

        // Newest first, id as tie-breaker for a total order
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        if let Some(cursor) = cursor {
            matched.retain(|item| {
                (item.created_at, item.id) < (cursor.created_at, cursor.id)
            });
        }

        let has_more = matched.len() > limit;
        let items: Vec<ContentItem> = matched.into_iter().take(limit).cloned().collect();
        let next_cursor = if has_more {
            items
                .last()
                .map(|item| Cursor::new(item.created_at, item.id).encode())
        } else {
            None
        };

        Ok(ItemPage { items, next_cursor })
    }

    async fn create_execution(&self, execution: &WorkflowExecution) -> Result<()> {
        let mut inner = self.lock()?;
        let already_active = inner.executions.values().any(|e| {
            e.item_id == execution.item_id && e.kind == execution.kind && e.is_active()
        });
        if already_active {
            return Err(Error::WorkflowAlreadyActive(format!(
                "{} workflow already active for item {}",
                execution.kind, execution.item_id
            )));
        }
        inner.executions.insert(execution.id, execution.clone());
        Ok(())
    }

    async fn bind_execution_ref(&self, id: Uuid, execution_ref: &str) -> Result<()> {
        let mut inner = self.lock()?;
        let stored = inner
            .executions
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Execution {id} not found")))?;
        stored.execution_ref = Some(execution_ref.to_string());
        Ok(())
    }

    async fn delete_execution(&self, id: Uuid) -> Result<()> {
        self.lock()?.executions.remove(&id);
        Ok(())
    }

    async fn find_execution_by_ref(&self, execution_ref: &str) -> Result<WorkflowExecution> {
        self.lock()?
            .executions
            .values()
            .find(|e| e.execution_ref.as_deref() == Some(execution_ref))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Execution {execution_ref} not found")))
    }

    async fn complete_execution(
        &self,
        id: Uuid,
        outcome: WorkflowOutcome,
    ) -> Result<WorkflowExecution> {
        let mut inner = self.lock()?;
        let stored = inner
            .executions
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Execution {id} not found")))?;
        if stored.completed_at.is_none() {
            stored.completed_at = Some(chrono::Utc::now());
            stored.outcome = Some(outcome);
        }
        Ok(stored.clone())
    }

    async fn list_executions(&self, item_id: Uuid) -> Result<Vec<WorkflowExecution>> {
        let inner = self.lock()?;
        let mut executions: Vec<WorkflowExecution> = inner
            .executions
            .values()
            .filter(|e| e.item_id == item_id)
            .cloned()
            .collect();
        executions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(executions)
    }

    async fn append_engagement(&self, record: &EngagementRecord) -> Result<()> {
        self.lock()?.engagements.push(record.clone());
        Ok(())
    }

    async fn remove_engagement(
        &self,
        item_id: Uuid,
        actor_sub: &str,
        kind: EngagementKind,
    ) -> Result<usize> {
        let mut inner = self.lock()?;
        let before = inner.engagements.len();
        inner.engagements.retain(|r| {
            !(r.item_id == item_id && r.actor_sub == actor_sub && r.kind == kind)
        });
        Ok(before - inner.engagements.len())
    }

    async fn list_engagements(&self, item_id: Uuid) -> Result<Vec<EngagementRecord>> {
        let inner = self.lock()?;
        let mut records: Vec<EngagementRecord> = inner
            .engagements
            .iter()
            .filter(|r| r.item_id == item_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}
