//! Worker write-back of processed media
//!
//! The background-change worker produces a cutout for each uploaded raw
//! image and reports the resulting key here. The write-back is unconditional
//! on status: moderation may have moved the item while processing ran, and
//! a fresh cutout is valid regardless.

use std::sync::Arc;

use uuid::Uuid;

use wardrobe_common::Result;

use crate::domain::entities::ContentItem;
use crate::repository::ItemStore;

#[derive(Clone)]
pub struct MediaProcessing {
    store: Arc<dyn ItemStore>,
}

impl MediaProcessing {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Attach the processed cutout key to an item
    ///
    /// Retried deliveries of the same key are no-ops.
    pub async fn attach_cutout(&self, item_id: Uuid, media_key: &str) -> Result<ContentItem> {
        let mut item = self.store.get_item(item_id).await?;
        if item.media_key.as_deref() == Some(media_key) {
            tracing::debug!(item_id = %item_id, "Cutout already attached; no-op");
            return Ok(item);
        }
        item.attach_cutout(media_key)?;
        let updated = self.store.update_item(&item).await?;
        tracing::info!(item_id = %item_id, media_key, "Processed media attached");
        Ok(updated)
    }
}
