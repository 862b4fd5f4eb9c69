//! Closet domain: content items, moderation, workflows, engagement

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::state::{ItemState, ItemStateMachine, TransitionEvent};

// Re-export repository types
pub use repository::{ItemFilter, ItemPage, ItemStore, MemoryItemStore, PostgresItemStore};

// Re-export service types
pub use service::{
    EngagementPublisher, MediaProcessing, ModerationService, NewItem, QueryGateway,
    WorkflowOrchestrator,
};

// Re-export API types
pub use api::routes;
pub use api::ClosetState;
