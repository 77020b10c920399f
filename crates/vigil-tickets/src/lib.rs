//! Pure triage domain logic shared across Vigil crates.
//!
//! Provides the ticket/snapshot data model, the activity-event normalizer,
//! the timeline merger, the staleness/attention classifier, and the
//! maintainer/bot registry. Everything here is side-effect-free; fetching
//! and I/O live in the runtime crates.

pub mod activity;
pub mod classify;
pub mod error;
pub mod registry;
pub mod snapshot;
pub mod ticket;
pub mod timeline;

pub use activity::{ActivityEvent, GHOST_LOGIN};
pub use classify::{classify, TriageFlags, DEFAULT_STALE_AFTER_BUSINESS_DAYS};
pub use error::TicketError;
pub use registry::TriageRegistry;
pub use snapshot::{TicketRecord, TriageSnapshot, TRIAGE_SNAPSHOT_SCHEMA_VERSION};
pub use ticket::{Ticket, TicketKind};
pub use timeline::merge_ticket_timeline;
