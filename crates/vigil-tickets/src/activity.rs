use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TicketError;

/// Sentinel login substituted for events whose account no longer exists.
/// Mirrors the tracker's own placeholder for deleted users.
pub const GHOST_LOGIN: &str = "ghost";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Public struct `ActivityEvent` used across Vigil components.
pub struct ActivityEvent {
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl ActivityEvent {
    /// Normalizes a raw `(author, timestamp)` pair into an activity event.
    ///
    /// A missing or blank login yields `TicketError::MissingAuthor`. Deleted
    /// accounts are a plausible data condition, not a defect, so callers
    /// that must keep going use [`ActivityEvent::from_parts_or_ghost`].
    pub fn from_parts(
        author: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TicketError> {
        match author.map(str::trim).filter(|login| !login.is_empty()) {
            Some(login) => Ok(Self {
                author: login.to_string(),
                created_at,
            }),
            None => Err(TicketError::MissingAuthor),
        }
    }

    /// Like [`ActivityEvent::from_parts`] but substitutes [`GHOST_LOGIN`]
    /// when the author login is absent.
    pub fn from_parts_or_ghost(author: Option<&str>, created_at: DateTime<Utc>) -> Self {
        Self::from_parts(author, created_at).unwrap_or_else(|_| Self {
            author: GHOST_LOGIN.to_string(),
            created_at,
        })
    }
}
