use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::business_days_between;

use crate::activity::ActivityEvent;
use crate::error::TicketError;
use crate::registry::TriageRegistry;
use crate::ticket::Ticket;

/// Quiet tickets older than this many business days count as stale.
pub const DEFAULT_STALE_AFTER_BUSINESS_DAYS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Public struct `TriageFlags` used across Vigil components.
pub struct TriageFlags {
    pub requires_attention: bool,
    pub is_stale: bool,
}

fn last_entry(ticket: &Ticket) -> Result<&ActivityEvent, TicketError> {
    ticket
        .comments
        .last()
        .ok_or_else(|| TicketError::EmptyTimeline {
            url: ticket.url.clone(),
        })
}

/// True when the most recent timeline entry came from outside the
/// maintainer registry, meaning a maintainer response may be owed.
pub fn requires_attention(
    ticket: &Ticket,
    registry: &TriageRegistry,
) -> Result<bool, TicketError> {
    let last = last_entry(ticket)?;
    Ok(!registry.is_maintainer(&last.author))
}

/// True when more than `threshold_business_days` business days separate the
/// most recent timeline entry from `now`. Weekends never contribute, so a
/// ticket quiet over Saturday and Sunday does not age.
pub fn is_stale(
    ticket: &Ticket,
    now: DateTime<Utc>,
    threshold_business_days: u32,
) -> Result<bool, TicketError> {
    let last = last_entry(ticket)?;
    Ok(business_days_between(last.created_at, now) > threshold_business_days)
}

/// Evaluates both triage predicates against the merged timeline.
pub fn classify(
    ticket: &Ticket,
    registry: &TriageRegistry,
    now: DateTime<Utc>,
    threshold_business_days: u32,
) -> Result<TriageFlags, TicketError> {
    Ok(TriageFlags {
        requires_attention: requires_attention(ticket, registry)?,
        is_stale: is_stale(ticket, now, threshold_business_days)?,
    })
}
