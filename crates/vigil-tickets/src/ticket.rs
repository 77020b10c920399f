use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `TicketKind` values.
pub enum TicketKind {
    Issue,
    PullRequest,
}

impl TicketKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pull_request",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Public struct `Ticket` used across Vigil components.
///
/// Constructed once per run from freshly fetched data and never mutated.
pub struct Ticket {
    pub url: String,
    pub title_html: String,
    pub kind: TicketKind,
    pub created_at: DateTime<Utc>,
    /// Tracker-reported totals, independent of any truncation applied to
    /// the nested comment/review windows.
    pub label_count: u64,
    pub assignee_count: u64,
    #[serde(default)]
    pub assignees: Vec<String>,
    /// The merged activity timeline, not raw comments: creation event,
    /// comments, and (for pull requests) reviews, bot authors removed,
    /// sorted non-decreasing by `created_at`. Non-empty for every
    /// well-formed ticket.
    pub comments: Vec<ActivityEvent>,
}

impl Ticket {
    pub fn last_activity(&self) -> Option<&ActivityEvent> {
        self.comments.last()
    }
}
