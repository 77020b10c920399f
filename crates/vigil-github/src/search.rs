use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use vigil_tickets::ticket::TicketKind;

use crate::error::FetchError;
use crate::raw_tickets::RawTicket;
use crate::source::TicketSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Enumerates supported `FetchStrategy` values.
pub enum FetchStrategy {
    /// One bounded page of full nodes. Silently truncates when the true
    /// candidate count exceeds the page size; acceptable when tracker
    /// volume is known to stay under the cap.
    DirectSearch,
    /// Lightweight number pagination followed by one batched lookup.
    /// Complete beyond a single page at the cost of an extra round of
    /// cheap requests.
    NumberedCandidates,
}

impl FetchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectSearch => "direct-search",
            Self::NumberedCandidates => "numbered-candidates",
        }
    }
}

/// Assembles the candidate set of raw tickets for one kind.
pub async fn assemble_candidate_tickets(
    source: &dyn TicketSource,
    strategy: FetchStrategy,
    kind: TicketKind,
    page_size: usize,
) -> Result<Vec<RawTicket>, FetchError> {
    match strategy {
        FetchStrategy::DirectSearch => source.fetch_ticket_page(kind, page_size).await,
        FetchStrategy::NumberedCandidates => {
            let numbers = collect_candidate_numbers(source, kind, page_size).await?;
            if numbers.is_empty() {
                // A zero-length batched query would be malformed.
                return Ok(Vec::new());
            }
            source.fetch_tickets_by_number(&numbers).await
        }
    }
}

/// Walks the lightweight search until a page comes back shorter than the
/// requested page size (including an empty one). That length check is the
/// only termination rule. Numbers can repeat when the underlying result set
/// shifts between page fetches, so the collected list is de-duplicated
/// preserving first-seen order.
pub async fn collect_candidate_numbers(
    source: &dyn TicketSource,
    kind: TicketKind,
    page_size: usize,
) -> Result<Vec<u64>, FetchError> {
    let mut numbers = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = source
            .search_candidate_numbers(kind, page_size, cursor.as_deref())
            .await?;
        let page_len = page.numbers.len();
        for number in page.numbers {
            if seen.insert(number) {
                numbers.push(number);
            }
        }
        if page_len < page_size {
            break;
        }
        cursor = page.next_cursor;
    }
    Ok(numbers)
}
