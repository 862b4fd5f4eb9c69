//! Opaque pagination cursor codec
//!
//! A cursor encodes the last-seen sort position of a newest-first listing:
//! the record's creation timestamp and its id as a tie-breaker. The token is
//! base64 so callers treat it as opaque and cannot depend on its layout.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

/// A decoded pagination position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

impl Cursor {
    pub fn new(created_at: DateTime<Utc>, id: Uuid) -> Self {
        Self { created_at, id }
    }

    /// Encode this position as an opaque token
    pub fn encode(&self) -> String {
        let raw = format!("{}|{}", self.created_at.to_rfc3339(), self.id);
        URL_SAFE_NO_PAD.encode(raw.as_bytes())
    }

    /// Decode an opaque token back into a position
    pub fn decode(token: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|_| Error::InvalidCursor("Malformed pagination token".to_string()))?;
        let raw = String::from_utf8(bytes)
            .map_err(|_| Error::InvalidCursor("Malformed pagination token".to_string()))?;

        let (ts, id) = raw
            .split_once('|')
            .ok_or_else(|| Error::InvalidCursor("Malformed pagination token".to_string()))?;

        let created_at = DateTime::parse_from_rfc3339(ts)
            .map_err(|_| Error::InvalidCursor("Malformed pagination token".to_string()))?
            .with_timezone(&Utc);
        let id = Uuid::parse_str(id)
            .map_err(|_| Error::InvalidCursor("Malformed pagination token".to_string()))?;

        Ok(Self { created_at, id })
    }
}
