use thiserror::Error;

#[derive(Debug, Error)]
/// Enumerates supported `FetchError` values.
///
/// Every variant except `UnknownTicketKind` is a transport or decode
/// failure. All of them are fatal for the run: the snapshot has no
/// partial-result mode, so the consumer treats a missing document as
/// stale data rather than trusting an incomplete triage set.
pub enum FetchError {
    #[error("missing github token: set GITHUB_TOKEN or log in with `gh auth login`")]
    MissingToken,
    #[error("invalid github authorization header")]
    InvalidToken,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("github api returned non-success status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("github graphql error: {0}")]
    Graphql(String),
    #[error("failed to decode github payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unknown ticket kind '{type_name}' in search results")]
    UnknownTicketKind { type_name: String },
}
