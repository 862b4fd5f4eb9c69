//! Engagement recording and fan-out
//!
//! Likes and comments adjust the denormalized counters on the item record
//! atomically; every action also appends to the engagement log and publishes
//! a namespaced event to the bus. Bus publishes are best-effort: a failed
//! publish is logged and never rolls back the recorded engagement.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use wardrobe_common::{ActorContext, Error, Result};
use wardrobe_events::{BusEvent, EventBus};

use crate::domain::entities::{ContentItem, EngagementKind, EngagementRecord, ItemStatus};
use crate::repository::ItemStore;

#[derive(Clone)]
pub struct EngagementPublisher {
    store: Arc<dyn ItemStore>,
    bus: Arc<dyn EventBus>,
}

impl EngagementPublisher {
    pub fn new(store: Arc<dyn ItemStore>, bus: Arc<dyn EventBus>) -> Self {
        Self { store, bus }
    }

    /// Record one engagement action against a published item
    ///
    /// Returns the updated item so callers see the new counter values.
    pub async fn record(
        &self,
        ctx: &ActorContext,
        item_id: Uuid,
        kind: EngagementKind,
        payload: Option<String>,
    ) -> Result<ContentItem> {
        let item = self.require_engageable(item_id).await?;

        if kind == EngagementKind::Comment && payload.as_deref().unwrap_or("").is_empty() {
            return Err(Error::Validation(
                "comment engagement requires a payload".to_string(),
            ));
        }

        let record = EngagementRecord::new(item_id, &ctx.sub, kind, payload);
        self.store.append_engagement(&record).await?;

        let mut item = item;
        if let Some(counter) = kind.counter() {
            let value = self.store.adjust_counter(item_id, counter, 1).await?;
            item.set_counter(counter, value);
        }

        self.publish_event(
            kind.event_name(),
            json!({
                "item_id": item_id,
                "actor_sub": ctx.sub,
                "engagement_id": record.id,
                "like_count": item.like_count,
                "comment_count": item.comment_count,
            }),
        )
        .await;

        tracing::info!(item_id = %item_id, actor = %ctx.sub, kind = ?kind, "Engagement recorded");
        Ok(item)
    }

    /// Retract an actor's engagement of one kind
    ///
    /// Idempotent: retracting an engagement that was never recorded leaves
    /// the counters untouched and publishes nothing.
    pub async fn remove(
        &self,
        ctx: &ActorContext,
        item_id: Uuid,
        kind: EngagementKind,
    ) -> Result<ContentItem> {
        let mut item = self.store.get_item(item_id).await?;

        let removed = self
            .store
            .remove_engagement(item_id, &ctx.sub, kind)
            .await?;
        if removed == 0 {
            return Ok(item);
        }

        if let Some(counter) = kind.counter() {
            let value = self
                .store
                .adjust_counter(item_id, counter, -(removed as i64))
                .await?;
            item.set_counter(counter, value);
        }

        self.publish_event(
            "closet/engagement.retracted",
            json!({
                "item_id": item_id,
                "actor_sub": ctx.sub,
                "kind": kind,
                "like_count": item.like_count,
                "comment_count": item.comment_count,
            }),
        )
        .await;

        tracing::info!(item_id = %item_id, actor = %ctx.sub, kind = ?kind, "Engagement retracted");
        Ok(item)
    }

    /// Engagement log for an item, newest first
    pub async fn list(&self, ctx: &ActorContext, item_id: Uuid) -> Result<Vec<EngagementRecord>> {
        let item = self.store.get_item(item_id).await?;
        if item.status != ItemStatus::Published {
            ctx.require_owner_or_moderator(&item.owner_sub)?;
        }
        self.store.list_engagements(item_id).await
    }

    async fn require_engageable(&self, item_id: Uuid) -> Result<ContentItem> {
        let item = self.store.get_item(item_id).await?;
        if item.status != ItemStatus::Published {
            return Err(Error::Validation(
                "only published items accept engagement".to_string(),
            ));
        }
        Ok(item)
    }

    async fn publish_event(&self, name: &str, data: serde_json::Value) {
        if let Err(e) = self.bus.publish(BusEvent::new(name, data)).await {
            tracing::warn!(event = name, error = %e, "Event publish failed; continuing");
        }
    }
}
