//! GitHub retrieval runtime for Vigil.
//!
//! Talks to the GitHub GraphQL API (direct search or numbered-candidate
//! pagination), decodes raw ticket nodes, and drives the triage pipeline
//! that turns fetched tickets into a snapshot document. Credential
//! resolution and transport retry policy live here too; the pure triage
//! rules stay in `vigil-tickets`.

pub mod auth;
pub mod error;
pub mod graphql_client;
pub mod pipeline;
pub mod raw_tickets;
pub mod repo;
pub mod search;
pub mod source;
pub mod transport;

pub use auth::resolve_api_token;
pub use error::FetchError;
pub use graphql_client::{GithubGraphqlClient, DEFAULT_API_BASE};
pub use pipeline::{build_triage_snapshot, PipelineOptions};
pub use raw_tickets::{decode_ticket_node, RawTicket};
pub use repo::RepoRef;
pub use search::FetchStrategy;
pub use source::{CandidatePage, TicketSource};
