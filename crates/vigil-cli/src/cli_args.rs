use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use vigil_github::FetchStrategy;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_page_size(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if !(1..=100).contains(&parsed) {
        return Err("value must be in range 1..=100".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// Enumerates supported `CliFetchStrategy` values.
pub enum CliFetchStrategy {
    NumberedCandidates,
    DirectSearch,
}

impl From<CliFetchStrategy> for FetchStrategy {
    fn from(value: CliFetchStrategy) -> Self {
        match value {
            CliFetchStrategy::NumberedCandidates => FetchStrategy::NumberedCandidates,
            CliFetchStrategy::DirectSearch => FetchStrategy::DirectSearch,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "vigil",
    about = "Snapshot generator for unlabeled open GitHub issues and pull requests",
    version
)]
/// Public struct `Cli` used across Vigil components.
pub struct Cli {
    #[arg(
        long,
        env = "VIGIL_REPO",
        help = "Repository to triage, in owner/name format"
    )]
    pub repo: String,

    #[arg(
        long,
        env = "VIGIL_API_BASE",
        default_value = "https://api.github.com",
        help = "Base URL for the GitHub API"
    )]
    pub api_base: String,

    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub API token; falls back to `gh auth token` when omitted"
    )]
    pub github_token: Option<String>,

    #[arg(
        long,
        env = "VIGIL_NO_GH_FALLBACK",
        default_value_t = false,
        help = "Disable the `gh auth token` credential fallback"
    )]
    pub no_gh_fallback: bool,

    #[arg(
        long,
        env = "VIGIL_STRATEGY",
        value_enum,
        default_value_t = CliFetchStrategy::NumberedCandidates,
        help = "Candidate assembly strategy: paginated number search plus one batched lookup, or a single bounded search page"
    )]
    pub strategy: CliFetchStrategy,

    #[arg(
        long,
        env = "VIGIL_PAGE_SIZE",
        default_value_t = 100,
        value_parser = parse_page_size,
        help = "Search page size (1..=100)"
    )]
    pub page_size: usize,

    #[arg(
        long,
        env = "VIGIL_STALE_AFTER_BUSINESS_DAYS",
        default_value_t = 3,
        help = "Business days without activity before a ticket counts as stale"
    )]
    pub stale_after_business_days: u32,

    #[arg(
        long,
        env = "VIGIL_REGISTRY_FILE",
        help = "TOML file listing maintainer and bot logins"
    )]
    pub registry_file: Option<PathBuf>,

    #[arg(
        long = "maintainer",
        env = "VIGIL_MAINTAINERS",
        value_delimiter = ',',
        help = "Additional maintainer logins, merged with the registry file"
    )]
    pub maintainer: Vec<String>,

    #[arg(
        long = "bot",
        env = "VIGIL_BOTS",
        value_delimiter = ',',
        help = "Additional bot logins, merged with the registry file"
    )]
    pub bot: Vec<String>,

    #[arg(
        long,
        env = "VIGIL_OUTPUT",
        help = "Write the snapshot to this path atomically instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = false,
        help = "Indent the snapshot JSON instead of emitting one compact line"
    )]
    pub pretty: bool,

    #[arg(
        long,
        env = "VIGIL_REQUEST_TIMEOUT_MS",
        default_value_t = 30_000,
        value_parser = parse_positive_u64,
        help = "Per-request timeout in milliseconds"
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long,
        env = "VIGIL_RETRY_MAX_ATTEMPTS",
        default_value_t = 3,
        value_parser = parse_positive_usize,
        help = "Maximum attempts per GraphQL call, first try included"
    )]
    pub retry_max_attempts: usize,

    #[arg(
        long,
        env = "VIGIL_RETRY_BASE_DELAY_MS",
        default_value_t = 500,
        value_parser = parse_positive_u64,
        help = "Base backoff delay in milliseconds for retryable failures"
    )]
    pub retry_base_delay_ms: u64,
}
