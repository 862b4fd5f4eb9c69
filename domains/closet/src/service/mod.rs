//! Closet engine services
//!
//! Request-driven orchestration over the item store. Each service takes the
//! actor context explicitly; per-item serialization comes from the store's
//! conditional writes, so none of these hold locks of their own.

pub mod engagement;
pub mod moderation;
pub mod processing;
pub mod queries;
pub mod workflows;

pub use engagement::EngagementPublisher;
pub use moderation::{ModerationService, NewItem};
pub use processing::MediaProcessing;
pub use queries::QueryGateway;
pub use workflows::WorkflowOrchestrator;
