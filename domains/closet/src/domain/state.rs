//! State machine for closet item moderation
//!
//! The authoritative status transition logic for a content item. Statuses
//! form a closed set and every transition is checked against an exhaustive
//! table, so a new status cannot be introduced without updating the guards
//! here. Guard conditions that depend on item data (raw media present,
//! moderator actor) are enforced by the entity and service layers; this
//! module only answers "is this edge in the graph".

use wardrobe_common::StateError;

/// Content item lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemState {
    Draft,
    Pending,
    Approved,
    Published,
    Rejected,
    SoftDeleted,
}

impl ItemState {
    /// Get all states reachable from this one in a single transition
    pub fn valid_transitions(&self) -> &'static [ItemState] {
        match self {
            Self::Draft => &[Self::Pending],
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved => &[Self::Published, Self::SoftDeleted],
            Self::Published => &[Self::SoftDeleted],
            // Rejected is semi-terminal: it can only be soft-deleted, never
            // un-rejected without an explicit restore of a prior state.
            Self::Rejected => &[Self::SoftDeleted],
            Self::SoftDeleted => &[Self::Approved, Self::Published, Self::Rejected],
        }
    }
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "DRAFT"),
            Self::Pending => write!(f, "PENDING"),
            Self::Approved => write!(f, "APPROVED"),
            Self::Published => write!(f, "PUBLISHED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::SoftDeleted => write!(f, "SOFT_DELETED"),
        }
    }
}

/// Events that trigger item state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionEvent {
    /// Owner submits a draft for moderation
    SubmitForReview,
    /// Moderator approves a pending item
    Approve,
    /// Moderator rejects a pending item
    Reject,
    /// An approved item goes live
    Publish,
    /// Hide a live or rejected item, remembering where it came from
    SoftDelete,
    /// Return a soft-deleted item to its recorded prior state
    Restore { prior: ItemState },
}

impl std::fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubmitForReview => write!(f, "submit_for_review"),
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
            Self::Publish => write!(f, "publish"),
            Self::SoftDelete => write!(f, "soft_delete"),
            Self::Restore { .. } => write!(f, "restore"),
        }
    }
}

/// Item state machine
pub struct ItemStateMachine;

impl ItemStateMachine {
    /// Attempt a state transition
    ///
    /// Returns the new state if the transition is valid, or an error otherwise.
    pub fn transition(
        current: ItemState,
        event: TransitionEvent,
    ) -> Result<ItemState, StateError> {
        let next = match (&current, &event) {
            (ItemState::Draft, TransitionEvent::SubmitForReview) => ItemState::Pending,

            (ItemState::Pending, TransitionEvent::Approve) => ItemState::Approved,
            (ItemState::Pending, TransitionEvent::Reject) => ItemState::Rejected,

            (ItemState::Approved, TransitionEvent::Publish) => ItemState::Published,
            (ItemState::Approved, TransitionEvent::SoftDelete) => ItemState::SoftDeleted,

            (ItemState::Published, TransitionEvent::SoftDelete) => ItemState::SoftDeleted,
            (ItemState::Rejected, TransitionEvent::SoftDelete) => ItemState::SoftDeleted,

            (ItemState::SoftDeleted, TransitionEvent::Restore { prior }) => {
                // Restore can only re-enter a state that soft-delete left from
                match prior {
                    ItemState::Approved | ItemState::Published | ItemState::Rejected => *prior,
                    other => {
                        return Err(StateError::GuardFailed(format!(
                            "cannot restore to {}",
                            other
                        )));
                    }
                }
            }

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: ItemState, event: &TransitionEvent) -> bool {
        Self::transition(current, event.clone()).is_ok()
    }
}
