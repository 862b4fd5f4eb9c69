//! Read-side listing over the item store
//!
//! All listings are newest-first with opaque keyset cursors. The gateway
//! decodes cursor tokens, clamps limits, and wraps the store's filtered
//! query with the common access shapes: own closet, the moderation queue,
//! and the published feed.

use std::sync::Arc;

use wardrobe_common::{ActorContext, Cursor, PageParams, Result};

use crate::domain::entities::{Audience, ItemStatus};
use crate::repository::{ItemFilter, ItemPage, ItemStore};

#[derive(Clone)]
pub struct QueryGateway {
    store: Arc<dyn ItemStore>,
}

impl QueryGateway {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// One page of items matching the filter, newest first
    pub async fn list(&self, filter: ItemFilter, page: &PageParams) -> Result<ItemPage> {
        let cursor = match &page.cursor {
            Some(token) => Some(Cursor::decode(token)?),
            None => None,
        };
        self.store.query_items(&filter, cursor, page.limit()).await
    }

    /// The calling actor's own items, every status included
    pub async fn my_closet(&self, ctx: &ActorContext, page: &PageParams) -> Result<ItemPage> {
        self.list(
            ItemFilter {
                owner_sub: Some(ctx.sub.clone()),
                search: page.search.clone(),
                ..Default::default()
            },
            page,
        )
        .await
    }

    /// Items awaiting moderation
    pub async fn moderation_queue(&self, ctx: &ActorContext, page: &PageParams) -> Result<ItemPage> {
        ctx.require_moderator()?;
        self.list(
            ItemFilter {
                status: Some(ItemStatus::Pending),
                search: page.search.clone(),
                ..Default::default()
            },
            page,
        )
        .await
    }

    /// Live items, optionally narrowed to one audience
    pub async fn published_feed(
        &self,
        audience: Option<Audience>,
        page: &PageParams,
    ) -> Result<ItemPage> {
        self.list(
            ItemFilter {
                status: Some(ItemStatus::Published),
                audience,
                search: page.search.clone(),
                ..Default::default()
            },
            page,
        )
        .await
    }
}
