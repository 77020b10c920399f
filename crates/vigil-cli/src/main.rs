//! Vigil binary: one-shot triage snapshot generator for a GitHub repository.

mod cli_args;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vigil_core::write_text_atomic;
use vigil_github::{
    build_triage_snapshot, resolve_api_token, GithubGraphqlClient, PipelineOptions, RepoRef,
};
use vigil_tickets::{TicketRecord, TriageRegistry};

use crate::cli_args::Cli;

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run_cli(cli).await
}

async fn run_cli(cli: Cli) -> Result<()> {
    let started = Instant::now();
    let repo = RepoRef::parse(&cli.repo)?;
    let token = resolve_api_token(cli.github_token.as_deref(), !cli.no_gh_fallback)?;
    let registry = TriageRegistry::load(cli.registry_file.as_deref(), &cli.maintainer, &cli.bot)?;
    let client = GithubGraphqlClient::new(
        &cli.api_base,
        &token,
        repo.clone(),
        cli.request_timeout_ms,
        cli.retry_max_attempts,
        cli.retry_base_delay_ms,
    )?;

    let mut options = PipelineOptions::new(repo.as_slug());
    options.strategy = cli.strategy.into();
    options.page_size = cli.page_size;
    options.stale_after_business_days = cli.stale_after_business_days;

    let snapshot = build_triage_snapshot(&client, &registry, &options).await?;

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    match cli.output.as_deref() {
        Some(path) => write_text_atomic(path, &rendered)
            .with_context(|| format!("failed to write snapshot to '{}'", path.display()))?,
        None => println!("{rendered}"),
    }

    let (requires_attention, stale) =
        flag_tallies(snapshot.issues.iter().chain(snapshot.pull_requests.iter()));
    tracing::info!(
        repo = %snapshot.repo,
        issues = snapshot.issues.len(),
        pull_requests = snapshot.pull_requests.len(),
        requires_attention = requires_attention,
        stale = stale,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "triage snapshot complete"
    );
    Ok(())
}

fn flag_tallies<'a>(records: impl Iterator<Item = &'a TicketRecord>) -> (usize, usize) {
    let mut requires_attention = 0_usize;
    let mut stale = 0_usize;
    for record in records {
        if record.flags.requires_attention {
            requires_attention += 1;
        }
        if record.flags.is_stale {
            stale += 1;
        }
    }
    (requires_attention, stale)
}
