//! Item store abstraction
//!
//! Persistence for content items, workflow executions, and engagement
//! records. The engine's semantics are store-agnostic: any backend that
//! honors the conditional-write and atomic-counter contracts below can sit
//! behind the trait. Two backends are provided: an in-process memory store
//! (default provider, also used by tests) and a Postgres store.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use wardrobe_common::{Cursor, Result};

use crate::domain::entities::{
    Audience, ContentItem, Counter, EngagementKind, EngagementRecord, ItemStatus,
    WorkflowExecution, WorkflowOutcome,
};

pub use memory::MemoryItemStore;
pub use postgres::PostgresItemStore;

/// Filter for item listings; all fields are conjunctive
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub owner_sub: Option<String>,
    pub status: Option<ItemStatus>,
    pub audience: Option<Audience>,
    /// Case-insensitive substring match over the title
    pub search: Option<String>,
}

/// One page of a newest-first item listing
#[derive(Debug, Clone)]
pub struct ItemPage {
    pub items: Vec<ContentItem>,
    /// Opaque token for the next page; None when exhausted
    pub next_cursor: Option<String>,
}

/// Persistence contract for the closet engine
///
/// Writes are single-record and atomic: a concurrent reader never observes a
/// partially applied update. Per-item mutual exclusion is achieved through
/// the conditional write (`update_item_if_status`) rather than locks.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Create or fully replace an item keyed by its id
    async fn put_item(&self, item: &ContentItem) -> Result<()>;

    /// Point lookup; `NotFound` for an unknown id
    async fn get_item(&self, id: Uuid) -> Result<ContentItem>;

    /// Replace the item only if its stored status matches `expected`.
    ///
    /// Fails with `Conflict` when the precondition does not hold. The
    /// caller decides whether that means an idempotent no-op or an invalid
    /// transition.
    async fn update_item_if_status(
        &self,
        expected: ItemStatus,
        item: &ContentItem,
    ) -> Result<ContentItem>;

    /// Unconditional single-record replace (worker media write-back)
    async fn update_item(&self, item: &ContentItem) -> Result<ContentItem>;

    /// Atomically adjust a counter, flooring at zero; returns the new value
    async fn adjust_counter(&self, id: Uuid, counter: Counter, delta: i64) -> Result<i64>;

    /// Newest-first page of items matching the filter
    async fn query_items(
        &self,
        filter: &ItemFilter,
        cursor: Option<Cursor>,
        limit: usize,
    ) -> Result<ItemPage>;

    /// Insert an execution record, failing with `WorkflowAlreadyActive` when
    /// an active execution of the same kind already exists for the item
    async fn create_execution(&self, execution: &WorkflowExecution) -> Result<()>;

    /// Bind the engine's execution reference after a successful start
    async fn bind_execution_ref(&self, id: Uuid, execution_ref: &str) -> Result<()>;

    /// Remove an execution record (start-failure compensation)
    async fn delete_execution(&self, id: Uuid) -> Result<()>;

    /// Look up an execution by the engine's reference
    async fn find_execution_by_ref(&self, execution_ref: &str) -> Result<WorkflowExecution>;

    /// Mark an execution completed with its outcome
    async fn complete_execution(
        &self,
        id: Uuid,
        outcome: WorkflowOutcome,
    ) -> Result<WorkflowExecution>;

    /// All executions recorded for an item, newest first
    async fn list_executions(&self, item_id: Uuid) -> Result<Vec<WorkflowExecution>>;

    /// Append an engagement record (append-only log)
    async fn append_engagement(&self, record: &EngagementRecord) -> Result<()>;

    /// Remove an actor's engagement record(s) of one kind; returns the count
    async fn remove_engagement(
        &self,
        item_id: Uuid,
        actor_sub: &str,
        kind: EngagementKind,
    ) -> Result<usize>;

    /// All engagement records for an item, newest first
    async fn list_engagements(&self, item_id: Uuid) -> Result<Vec<EngagementRecord>>;
}
