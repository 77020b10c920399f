use chrono::{DateTime, Utc};
use vigil_tickets::classify::{classify, DEFAULT_STALE_AFTER_BUSINESS_DAYS};
use vigil_tickets::registry::TriageRegistry;
use vigil_tickets::snapshot::{TicketRecord, TriageSnapshot, TRIAGE_SNAPSHOT_SCHEMA_VERSION};
use vigil_tickets::ticket::TicketKind;

use crate::error::FetchError;
use crate::raw_tickets::RawTicket;
use crate::search::{assemble_candidate_tickets, FetchStrategy};
use crate::source::TicketSource;

const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
/// Public struct `PipelineOptions` used across Vigil components.
pub struct PipelineOptions {
    pub repo_slug: String,
    pub strategy: FetchStrategy,
    pub page_size: usize,
    pub stale_after_business_days: u32,
    /// Fixed clock for tests; a live run stamps `Utc::now()`.
    pub now_override: Option<DateTime<Utc>>,
}

impl PipelineOptions {
    pub fn new(repo_slug: impl Into<String>) -> Self {
        Self {
            repo_slug: repo_slug.into(),
            strategy: FetchStrategy::NumberedCandidates,
            page_size: DEFAULT_PAGE_SIZE,
            stale_after_business_days: DEFAULT_STALE_AFTER_BUSINESS_DAYS,
            now_override: None,
        }
    }
}

/// Runs the full triage pass and returns the snapshot document.
///
/// Issues and pull requests are fetched concurrently; any fetch error
/// aborts the whole run, so a snapshot is either complete or absent.
pub async fn build_triage_snapshot(
    source: &dyn TicketSource,
    registry: &TriageRegistry,
    options: &PipelineOptions,
) -> Result<TriageSnapshot, FetchError> {
    let (raw_issues, raw_pulls) = tokio::try_join!(
        assemble_candidate_tickets(source, options.strategy, TicketKind::Issue, options.page_size),
        assemble_candidate_tickets(
            source,
            options.strategy,
            TicketKind::PullRequest,
            options.page_size
        ),
    )?;
    tracing::debug!(
        issues = raw_issues.len(),
        pull_requests = raw_pulls.len(),
        "fetched candidate tickets"
    );

    let now = options.now_override.unwrap_or_else(Utc::now);
    let issues = assemble_records(
        raw_issues,
        registry,
        now,
        options.stale_after_business_days,
    );
    let pull_requests = assemble_records(
        raw_pulls,
        registry,
        now,
        options.stale_after_business_days,
    );

    Ok(TriageSnapshot {
        schema_version: TRIAGE_SNAPSHOT_SCHEMA_VERSION,
        repo: options.repo_slug.clone(),
        generated_at: now,
        issues,
        pull_requests,
    })
}

fn assemble_records(
    raw_tickets: Vec<RawTicket>,
    registry: &TriageRegistry,
    now: DateTime<Utc>,
    stale_after_business_days: u32,
) -> Vec<TicketRecord> {
    let mut records = Vec::with_capacity(raw_tickets.len());
    for raw in raw_tickets {
        let url = raw.url().to_string();
        let Some(ticket) = raw.into_ticket(registry) else {
            tracing::warn!(url = %url, "skipping ticket with no human activity");
            continue;
        };
        match classify(&ticket, registry, now, stale_after_business_days) {
            Ok(flags) => records.push(TicketRecord { ticket, flags }),
            Err(error) => {
                // Normalization never emits an empty timeline, so this arm
                // is unreachable in practice; skip rather than abort.
                tracing::warn!(url = %ticket.url, error = %error, "skipping unclassifiable ticket");
            }
        }
    }
    records
}
