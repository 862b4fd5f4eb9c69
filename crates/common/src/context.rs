//! Actor context carried into every engine call
//!
//! Identity and the moderator flag are supplied by an upstream identity
//! provider and trusted as already verified. The context is passed
//! explicitly into service calls; there is no ambient global session.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::Error;

/// Header carrying the verified subject identifier
pub const ACTOR_SUB_HEADER: &str = "x-actor-sub";

/// Header carrying the verified moderator flag ("true"/"1")
pub const ACTOR_MODERATOR_HEADER: &str = "x-actor-moderator";

/// Represents an authenticated actor making an engine call
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub sub: String,
    pub moderator: bool,
}

impl ActorContext {
    /// Create a new actor context
    pub fn new(sub: impl Into<String>, moderator: bool) -> Self {
        Self {
            sub: sub.into(),
            moderator,
        }
    }

    /// Context for an ordinary item owner
    pub fn owner(sub: impl Into<String>) -> Self {
        Self::new(sub, false)
    }

    /// Context for a moderation actor
    pub fn moderator(sub: impl Into<String>) -> Self {
        Self::new(sub, true)
    }

    /// Context for system-driven transitions (workflow completions)
    pub fn system() -> Self {
        Self::new("system", true)
    }

    /// Check the moderator flag, returning an authorization error when unset
    pub fn require_moderator(&self) -> Result<(), Error> {
        if self.moderator {
            Ok(())
        } else {
            Err(Error::Authorization("Moderator access required".to_string()))
        }
    }

    /// Check that the actor owns the given subject or is a moderator
    pub fn require_owner_or_moderator(&self, owner_sub: &str) -> Result<(), Error> {
        if self.moderator || self.sub == owner_sub {
            Ok(())
        } else {
            Err(Error::Authorization(
                "Only the item owner or a moderator may perform this action".to_string(),
            ))
        }
    }
}

impl<S> FromRequestParts<S> for ActorContext
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let sub = parts
            .headers
            .get(ACTOR_SUB_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::Authentication("Missing actor identity header".to_string())
            })?
            .to_string();

        let moderator = parts
            .headers
            .get(ACTOR_MODERATOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| matches!(v, "true" | "1"))
            .unwrap_or(false);

        Ok(Self { sub, moderator })
    }
}
