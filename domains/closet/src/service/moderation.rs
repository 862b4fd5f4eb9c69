//! Moderation service: the authoritative driver of item status transitions
//!
//! Transitions are serialized per item through the store's conditional
//! write: the precondition is always "current status equals the status this
//! actor read". A transition that loses the race is absorbed when the winner
//! drove the item to the same target (idempotent success under at-least-once
//! delivery), and rejected as invalid otherwise.

use std::sync::Arc;

use uuid::Uuid;

use wardrobe_common::{ActorContext, Error, Result};

use crate::domain::entities::{Audience, ContentItem, ItemStatus};
use crate::repository::ItemStore;

/// Input for creating a draft item
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub raw_media_key: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub tags: Vec<String>,
    pub coin_value: Option<i32>,
}

#[derive(Clone)]
pub struct ModerationService {
    store: Arc<dyn ItemStore>,
}

impl ModerationService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Create a new draft item owned by the calling actor
    pub async fn create_item(&self, ctx: &ActorContext, input: NewItem) -> Result<ContentItem> {
        let item = ContentItem::new(
            &ctx.sub,
            input.title,
            input.raw_media_key,
            input.category,
            input.subcategory,
            input.tags,
            input.coin_value,
        )?;
        self.store.put_item(&item).await?;
        tracing::info!(item_id = %item.id, owner = %ctx.sub, "Closet item created");
        Ok(item)
    }

    /// Fetch one item
    ///
    /// Published items are readable by any actor; everything else only by
    /// the owner or a moderator (rejected and soft-deleted items stay
    /// queryable for them).
    pub async fn get_item(&self, ctx: &ActorContext, id: Uuid) -> Result<ContentItem> {
        let item = self.store.get_item(id).await?;
        if item.status != ItemStatus::Published {
            ctx.require_owner_or_moderator(&item.owner_sub)?;
        }
        Ok(item)
    }

    /// Owner submits a draft for moderation
    pub async fn submit_for_review(&self, ctx: &ActorContext, id: Uuid) -> Result<ContentItem> {
        let item = self.store.get_item(id).await?;
        ctx.require_owner_or_moderator(&item.owner_sub)?;
        self.transition(item, "submit_for_review", ItemStatus::Pending, |item| {
            item.submit_for_review()
        })
        .await
    }

    /// Moderator approves a pending item, optionally fixing the audience
    pub async fn approve(
        &self,
        ctx: &ActorContext,
        id: Uuid,
        audience: Option<Audience>,
    ) -> Result<ContentItem> {
        ctx.require_moderator()?;
        let item = self.store.get_item(id).await?;
        self.transition(item, "approve", ItemStatus::Approved, move |item| {
            item.approve(audience)
        })
        .await
    }

    /// Moderator rejects a pending item with a reason
    pub async fn reject(
        &self,
        ctx: &ActorContext,
        id: Uuid,
        reason: String,
    ) -> Result<ContentItem> {
        ctx.require_moderator()?;
        let item = self.store.get_item(id).await?;
        self.transition(item, "reject", ItemStatus::Rejected, move |item| {
            item.reject(reason.clone())
        })
        .await
    }

    /// Take an approved item live
    pub async fn publish(&self, ctx: &ActorContext, id: Uuid) -> Result<ContentItem> {
        ctx.require_moderator()?;
        let item = self.store.get_item(id).await?;
        self.transition(item, "publish", ItemStatus::Published, |item| item.publish())
            .await
    }

    /// Hide an item, remembering its prior status for restore
    pub async fn soft_delete(
        &self,
        ctx: &ActorContext,
        id: Uuid,
        reason: Option<String>,
    ) -> Result<ContentItem> {
        ctx.require_moderator()?;
        let item = self.store.get_item(id).await?;
        self.transition(item, "soft_delete", ItemStatus::SoftDeleted, move |item| {
            item.soft_delete(reason.clone())
        })
        .await
    }

    /// Return a soft-deleted item to its recorded prior status
    pub async fn restore(&self, ctx: &ActorContext, id: Uuid) -> Result<ContentItem> {
        ctx.require_moderator()?;
        let item = self.store.get_item(id).await?;
        // A completed restore clears the recorded prior status, so a retry
        // finds the item already out of SOFT_DELETED with nothing to apply.
        // Absorb it like any other replayed moderation action.
        if item.status != ItemStatus::SoftDeleted && item.prior_status.is_none() {
            return Ok(item);
        }
        // The target depends on the recorded prior status, so the generic
        // same-target race absorption does not apply here.
        let expected = item.status;
        let mut next = item;
        next.restore()?;
        let updated = self.store.update_item_if_status(expected, &next).await?;
        tracing::info!(item_id = %updated.id, status = %updated.status, "Closet item restored");
        Ok(updated)
    }

    /// Moderator changes the audience without touching the status
    pub async fn set_audience(
        &self,
        ctx: &ActorContext,
        id: Uuid,
        audience: Audience,
    ) -> Result<ContentItem> {
        ctx.require_moderator()?;
        let item = self.store.get_item(id).await?;
        if item.audience == audience {
            return Ok(item);
        }
        let expected = item.status;
        let mut next = item;
        next.set_audience(audience)?;
        // Conditioned on the status so audience writes serialize with
        // concurrent status transitions
        let updated = self.store.update_item_if_status(expected, &next).await?;
        tracing::info!(item_id = %updated.id, audience = ?audience, "Audience updated");
        Ok(updated)
    }

    /// Shared transition driver: idempotent no-op when the item is already
    /// in the target state, conditional write on the observed status, and
    /// race absorption when a concurrent caller won with the same target.
    async fn transition<F>(
        &self,
        item: ContentItem,
        event: &str,
        target: ItemStatus,
        apply: F,
    ) -> Result<ContentItem>
    where
        F: Fn(&mut ContentItem) -> Result<()>,
    {
        if item.status == target {
            tracing::debug!(item_id = %item.id, event, "Already in target state; no-op");
            return Ok(item);
        }

        let expected = item.status;
        let mut next = item;
        apply(&mut next)?;

        match self.store.update_item_if_status(expected, &next).await {
            Ok(updated) => {
                tracing::info!(item_id = %updated.id, event, status = %updated.status, "Item transitioned");
                Ok(updated)
            }
            Err(Error::Conflict(_)) => {
                // Lost the race; succeed if the winner reached the same state
                let current = self.store.get_item(next.id).await?;
                if current.status == target {
                    Ok(current)
                } else {
                    Err(Error::InvalidTransition {
                        event: event.to_string(),
                        status: current.status.to_string(),
                    })
                }
            }
            Err(e) => Err(e),
        }
    }
}
