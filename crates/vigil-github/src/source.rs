use async_trait::async_trait;
use vigil_tickets::ticket::TicketKind;

use crate::error::FetchError;
use crate::raw_tickets::RawTicket;

/// One page of lightweight search results: candidate ticket numbers plus the
/// cursor for the page after it. A full page always carries the cursor that
/// continues the walk; the cursor of a short (final) page is never used.
#[derive(Debug, Clone, Default)]
pub struct CandidatePage {
    pub numbers: Vec<u64>,
    pub next_cursor: Option<String>,
}

#[async_trait]
/// Trait contract for `TicketSource` behavior.
///
/// Seam between candidate-set assembly and the GraphQL transport.
pub trait TicketSource: Send + Sync {
    /// One bounded page of fully hydrated tickets (direct-search strategy).
    async fn fetch_ticket_page(
        &self,
        kind: TicketKind,
        page_size: usize,
    ) -> Result<Vec<RawTicket>, FetchError>;

    /// One lightweight page of candidate ticket numbers.
    async fn search_candidate_numbers(
        &self,
        kind: TicketKind,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<CandidatePage, FetchError>;

    /// Batched lookup of fully hydrated tickets. Ticket numbers share one
    /// space across issues and pull requests, so no kind is needed. Never
    /// called with an empty `numbers` list.
    async fn fetch_tickets_by_number(&self, numbers: &[u64])
        -> Result<Vec<RawTicket>, FetchError>;
}
