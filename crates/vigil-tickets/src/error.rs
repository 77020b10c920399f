use thiserror::Error;

#[derive(Debug, Error)]
/// Enumerates supported `TicketError` values.
pub enum TicketError {
    #[error("activity event has no author login")]
    MissingAuthor,
    #[error("ticket {url} has an empty activity timeline")]
    EmptyTimeline { url: String },
    #[error("failed to read registry file {path}: {source}")]
    RegistryIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse registry file {path}: {source}")]
    RegistryParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
