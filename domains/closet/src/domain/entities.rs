//! Closet domain entities
//!
//! The content item is the single point of truth for moderation state;
//! workflow executions and engagement records are separate records that
//! reference it, never embedded inside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wardrobe_common::{Error, Result};

use crate::domain::state::{ItemState, ItemStateMachine, TransitionEvent};

/// Content item moderation status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[sqlx(type_name = "item_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Published,
    Rejected,
    SoftDeleted,
}

impl ItemStatus {
    /// Convert to state machine state
    pub fn to_state(self) -> ItemState {
        match self {
            ItemStatus::Draft => ItemState::Draft,
            ItemStatus::Pending => ItemState::Pending,
            ItemStatus::Approved => ItemState::Approved,
            ItemStatus::Published => ItemState::Published,
            ItemStatus::Rejected => ItemState::Rejected,
            ItemStatus::SoftDeleted => ItemState::SoftDeleted,
        }
    }

    /// Create from state machine state
    pub fn from_state(state: ItemState) -> Self {
        match state {
            ItemState::Draft => ItemStatus::Draft,
            ItemState::Pending => ItemStatus::Pending,
            ItemState::Approved => ItemStatus::Approved,
            ItemState::Published => ItemStatus::Published,
            ItemState::Rejected => ItemStatus::Rejected,
            ItemState::SoftDeleted => ItemStatus::SoftDeleted,
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_state().fmt(f)
    }
}

/// Audience a published item is visible to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[sqlx(type_name = "item_audience", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Audience {
    #[default]
    Public,
    Besties,
    Exclusive,
}

/// The central moderated entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentItem {
    pub id: Uuid,
    pub owner_sub: String,
    pub title: String,
    /// Original upload reference, set at creation
    pub raw_media_key: String,
    /// Processed cutout reference, written back by the background worker
    pub media_key: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub tags: Vec<String>,
    pub coin_value: Option<i32>,
    pub status: ItemStatus,
    pub audience: Audience,
    pub moderation_reason: Option<String>,
    /// Status recorded at soft-delete so restore can return to it
    pub prior_status: Option<ItemStatus>,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Create a new draft item with validation
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_sub: impl Into<String>,
        title: impl Into<String>,
        raw_media_key: impl Into<String>,
        category: impl Into<String>,
        subcategory: Option<String>,
        tags: Vec<String>,
        coin_value: Option<i32>,
    ) -> Result<Self> {
        let raw_media_key = raw_media_key.into();
        if raw_media_key.is_empty() {
            return Err(Error::Validation(
                "raw_media_key is required".to_string(),
            ));
        }
        if let Some(value) = coin_value {
            if value < 0 {
                return Err(Error::Validation(
                    "coin_value cannot be negative".to_string(),
                ));
            }
        }

        // Tags behave as a set
        let mut tags = tags;
        tags.sort();
        tags.dedup();

        let now = Utc::now();
        Ok(ContentItem {
            id: Uuid::new_v4(),
            owner_sub: owner_sub.into(),
            title: title.into(),
            raw_media_key,
            media_key: None,
            category: category.into(),
            subcategory,
            tags,
            coin_value,
            status: ItemStatus::default(),
            audience: Audience::default(),
            moderation_reason: None,
            prior_status: None,
            like_count: 0,
            comment_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Processed cutout has been written back; the item can be reviewed at
    /// full fidelity. An item with only raw media is still reviewable.
    pub fn is_ready_for_review(&self) -> bool {
        self.media_key.is_some()
    }

    fn apply_transition(&self, event: TransitionEvent) -> Result<ItemState> {
        ItemStateMachine::transition(self.status.to_state(), event).map_err(Error::from)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Owner submits the draft for moderation
    pub fn submit_for_review(&mut self) -> Result<()> {
        if self.raw_media_key.is_empty() {
            return Err(Error::Validation(
                "cannot submit for review without raw media".to_string(),
            ));
        }
        let next = self.apply_transition(TransitionEvent::SubmitForReview)?;
        self.status = ItemStatus::from_state(next);
        self.touch();
        Ok(())
    }

    /// Moderator approves a pending item
    ///
    /// A supplied audience overrides the current one; omitting it keeps the
    /// item's audience (PUBLIC unless an admin changed it earlier). Any prior
    /// rejection reason is cleared.
    pub fn approve(&mut self, audience: Option<Audience>) -> Result<()> {
        let next = self.apply_transition(TransitionEvent::Approve)?;
        self.status = ItemStatus::from_state(next);
        if let Some(audience) = audience {
            self.audience = audience;
        }
        self.moderation_reason = None;
        self.touch();
        Ok(())
    }

    /// Moderator rejects a pending item with a reason
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<()> {
        let next = self.apply_transition(TransitionEvent::Reject)?;
        self.status = ItemStatus::from_state(next);
        self.moderation_reason = Some(reason.into());
        self.touch();
        Ok(())
    }

    /// An approved item goes live
    pub fn publish(&mut self) -> Result<()> {
        let next = self.apply_transition(TransitionEvent::Publish)?;
        self.status = ItemStatus::from_state(next);
        self.touch();
        Ok(())
    }

    /// Hide the item, recording the status it left so restore can return to it
    pub fn soft_delete(&mut self, reason: Option<String>) -> Result<()> {
        let prior = self.status;
        let next = self.apply_transition(TransitionEvent::SoftDelete)?;
        self.status = ItemStatus::from_state(next);
        self.prior_status = Some(prior);
        if reason.is_some() {
            self.moderation_reason = reason;
        }
        self.touch();
        Ok(())
    }

    /// Return a soft-deleted item to its recorded prior status
    pub fn restore(&mut self) -> Result<()> {
        let prior = self.prior_status.ok_or_else(|| {
            Error::Validation("no prior status recorded for restore".to_string())
        })?;
        let next = self.apply_transition(TransitionEvent::Restore {
            prior: prior.to_state(),
        })?;
        self.status = ItemStatus::from_state(next);
        self.prior_status = None;
        self.moderation_reason = None;
        self.touch();
        Ok(())
    }

    /// Moderator changes the audience; legal on any status except
    /// soft-deleted and never changes the status itself.
    pub fn set_audience(&mut self, audience: Audience) -> Result<()> {
        if self.status == ItemStatus::SoftDeleted {
            return Err(Error::InvalidTransition {
                event: "set_audience".to_string(),
                status: self.status.to_string(),
            });
        }
        self.audience = audience;
        self.touch();
        Ok(())
    }

    /// Write back a counter value as reported by the store
    pub fn set_counter(&mut self, counter: Counter, value: i64) {
        match counter {
            Counter::Like => self.like_count = value,
            Counter::Comment => self.comment_count = value,
        }
    }

    /// Background worker write-back of the processed cutout key
    pub fn attach_cutout(&mut self, media_key: impl Into<String>) -> Result<()> {
        let media_key = media_key.into();
        if media_key.is_empty() {
            return Err(Error::Validation("media_key is required".to_string()));
        }
        self.media_key = Some(media_key);
        self.touch();
        Ok(())
    }
}

/// Named long-running workflow kinds tied to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "workflow_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowKind {
    Approval,
    BackgroundChange,
    StoryPublish,
}

impl WorkflowKind {
    /// Workflow definition name on the external engine
    pub fn workflow_name(&self) -> &'static str {
        match self {
            Self::Approval => "closet-approval",
            Self::BackgroundChange => "closet-background-change",
            Self::StoryPublish => "closet-story-publish",
        }
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approval => write!(f, "APPROVAL"),
            Self::BackgroundChange => write!(f, "BACKGROUND_CHANGE"),
            Self::StoryPublish => write!(f, "STORY_PUBLISH"),
        }
    }
}

/// Outcome reported by the workflow engine on completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "workflow_outcome", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowOutcome {
    Succeeded,
    Failed,
}

/// One run of an external workflow, linked to one item
///
/// At most one active (uncompleted) execution may exist per (item, kind);
/// the store enforces this with a conditional insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkflowExecution {
    pub id: Uuid,
    pub item_id: Uuid,
    pub kind: WorkflowKind,
    /// Opaque engine handle, bound once the start handshake succeeds
    pub execution_ref: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub outcome: Option<WorkflowOutcome>,
}

impl WorkflowExecution {
    pub fn new(item_id: Uuid, kind: WorkflowKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            kind,
            execution_ref: None,
            started_at: Utc::now(),
            completed_at: None,
            outcome: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.completed_at.is_none()
    }
}

/// Discrete engagement actions against an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "engagement_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngagementKind {
    Like,
    Comment,
    Pin,
    Share,
}

/// Per-item counters kept on the item record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Like,
    Comment,
}

impl EngagementKind {
    /// The item counter this engagement adjusts, if any
    pub fn counter(&self) -> Option<Counter> {
        match self {
            Self::Like => Some(Counter::Like),
            Self::Comment => Some(Counter::Comment),
            Self::Pin | Self::Share => None,
        }
    }

    /// Namespaced bus event name for this engagement
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Like => "closet/engagement.liked",
            Self::Comment => "closet/engagement.commented",
            Self::Pin => "closet/engagement.pinned",
            Self::Share => "closet/engagement.shared",
        }
    }
}

/// Append-only record of a single engagement action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EngagementRecord {
    pub id: Uuid,
    pub item_id: Uuid,
    pub actor_sub: String,
    pub kind: EngagementKind,
    /// Comment text, when kind is COMMENT
    pub payload: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EngagementRecord {
    pub fn new(
        item_id: Uuid,
        actor_sub: impl Into<String>,
        kind: EngagementKind,
        payload: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            actor_sub: actor_sub.into(),
            kind,
            payload,
            created_at: Utc::now(),
        }
    }
}
