//! Closet domain state

use std::sync::Arc;

use wardrobe_events::EventBus;
use wardrobe_workflow::WorkflowEngine;

use crate::repository::ItemStore;
use crate::service::{
    EngagementPublisher, MediaProcessing, ModerationService, QueryGateway, WorkflowOrchestrator,
};

/// Application state for the closet domain
#[derive(Clone)]
pub struct ClosetState {
    pub moderation: ModerationService,
    pub workflows: WorkflowOrchestrator,
    pub engagement: EngagementPublisher,
    pub queries: QueryGateway,
    pub processing: MediaProcessing,
}

impl ClosetState {
    /// Wire all services onto one store, engine, and bus
    pub fn new(
        store: Arc<dyn ItemStore>,
        engine: Arc<dyn WorkflowEngine>,
        bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            moderation: ModerationService::new(store.clone()),
            workflows: WorkflowOrchestrator::new(store.clone(), engine),
            engagement: EngagementPublisher::new(store.clone(), bus),
            queries: QueryGateway::new(store.clone()),
            processing: MediaProcessing::new(store),
        }
    }
}
