use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use vigil_tickets::activity::ActivityEvent;
use vigil_tickets::registry::TriageRegistry;
use vigil_tickets::ticket::{Ticket, TicketKind};
use vigil_tickets::timeline::merge_ticket_timeline;

use crate::error::FetchError;

#[derive(Debug, Clone, Deserialize)]
/// Public struct `RawActor` used across Vigil components.
pub struct RawActor {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Public struct `RawActivityNode` used across Vigil components.
pub struct RawActivityNode {
    pub created_at: DateTime<Utc>,
    /// `None` for deleted accounts; normalization substitutes the ghost
    /// sentinel so the event still counts as human activity.
    pub author: Option<RawActor>,
}

impl RawActivityNode {
    fn to_event(&self) -> ActivityEvent {
        ActivityEvent::from_parts_or_ghost(
            self.author.as_ref().map(|actor| actor.login.as_str()),
            self.created_at,
        )
    }
}

/// Bounded window of recent comment or review nodes. The fetch layer asks
/// for the most recent 100; older activity is out of scope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawActivityWindow {
    #[serde(default)]
    pub nodes: Vec<RawActivityNode>,
}

impl RawActivityWindow {
    fn to_events(&self) -> Vec<ActivityEvent> {
        self.nodes.iter().map(RawActivityNode::to_event).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Public struct `RawCountConnection` used across Vigil components.
pub struct RawCountConnection {
    pub total_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Public struct `RawAssigneeConnection` used across Vigil components.
pub struct RawAssigneeConnection {
    pub total_count: u64,
    #[serde(default)]
    pub nodes: Vec<RawActor>,
}

/// Fields shared by both ticket kinds as returned from the search API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTicketCore {
    #[serde(rename = "titleHTML")]
    pub title_html: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub author: Option<RawActor>,
    pub labels: RawCountConnection,
    pub assignees: RawAssigneeConnection,
    pub comments: RawActivityWindow,
}

#[derive(Debug, Clone, Deserialize)]
/// Public struct `RawPullRequest` used across Vigil components.
pub struct RawPullRequest {
    #[serde(flatten)]
    pub core: RawTicketCore,
    pub reviews: RawActivityWindow,
}

/// A fetched ticket node, tagged by kind. Only pull requests carry a
/// reviews window.
#[derive(Debug, Clone)]
pub enum RawTicket {
    Issue(RawTicketCore),
    PullRequest(RawPullRequest),
}

impl RawTicket {
    pub fn kind(&self) -> TicketKind {
        match self {
            Self::Issue(_) => TicketKind::Issue,
            Self::PullRequest(_) => TicketKind::PullRequest,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Issue(core) => &core.url,
            Self::PullRequest(pull) => &pull.core.url,
        }
    }

    /// Normalizes the raw node into a `Ticket` with its merged timeline.
    ///
    /// Returns `None` when bot filtering leaves no activity at all (a
    /// bot-opened ticket nobody replied to); such a ticket carries nothing
    /// a human could triage.
    pub fn into_ticket(self, registry: &TriageRegistry) -> Option<Ticket> {
        let kind = self.kind();
        let (core, reviews) = match self {
            Self::Issue(core) => (core, RawActivityWindow::default()),
            Self::PullRequest(pull) => (pull.core, pull.reviews),
        };

        let creation = ActivityEvent::from_parts_or_ghost(
            core.author.as_ref().map(|actor| actor.login.as_str()),
            core.created_at,
        );
        let timeline = merge_ticket_timeline(
            creation,
            core.comments.to_events(),
            reviews.to_events(),
            registry,
        );
        if timeline.is_empty() {
            return None;
        }

        Some(Ticket {
            url: core.url,
            title_html: core.title_html,
            kind,
            created_at: core.created_at,
            label_count: core.labels.total_count,
            assignee_count: core.assignees.total_count,
            assignees: core
                .assignees
                .nodes
                .into_iter()
                .map(|actor| actor.login)
                .collect(),
            comments: timeline,
        })
    }
}

/// Decodes one search/lookup node, dispatching on `__typename`.
///
/// An unexpected tag is a typed fatal error rather than a skipped record.
pub fn decode_ticket_node(node: &Value) -> Result<RawTicket, FetchError> {
    let type_name = node
        .get("__typename")
        .and_then(Value::as_str)
        .unwrap_or_default();
    match type_name {
        "Issue" => Ok(RawTicket::Issue(serde_json::from_value(node.clone())?)),
        "PullRequest" => Ok(RawTicket::PullRequest(serde_json::from_value(
            node.clone(),
        )?)),
        other => Err(FetchError::UnknownTicketKind {
            type_name: other.to_string(),
        }),
    }
}
