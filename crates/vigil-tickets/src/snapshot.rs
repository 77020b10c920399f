use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::TriageFlags;
use crate::ticket::Ticket;

pub const TRIAGE_SNAPSHOT_SCHEMA_VERSION: u32 = 1;

fn triage_snapshot_schema_version() -> u32 {
    TRIAGE_SNAPSHOT_SCHEMA_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Public struct `TicketRecord` used across Vigil components.
pub struct TicketRecord {
    #[serde(flatten)]
    pub ticket: Ticket,
    #[serde(flatten)]
    pub flags: TriageFlags,
}

/// Public struct `TriageSnapshot` used across Vigil components.
///
/// The dashboard feed document: one full recomputation per run, collections
/// preserved in the order the tracker returned them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageSnapshot {
    #[serde(default = "triage_snapshot_schema_version")]
    pub schema_version: u32,
    pub repo: String,
    pub generated_at: DateTime<Utc>,
    pub issues: Vec<TicketRecord>,
    pub pull_requests: Vec<TicketRecord>,
}
