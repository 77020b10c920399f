use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use vigil_tickets::ticket::TicketKind;

use crate::error::FetchError;
use crate::raw_tickets::{decode_ticket_node, RawTicket};
use crate::repo::RepoRef;
use crate::source::{CandidatePage, TicketSource};
use crate::transport::{
    is_retryable_github_status, is_retryable_transport_error, parse_retry_after, retry_delay,
    truncate_for_error,
};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const ERROR_BODY_PREVIEW_LEN: usize = 800;

/// Shared field selections for fully hydrated ticket nodes. Comment and
/// review windows are capped at the most recent 100 entries; the timeline
/// merger treats that window as recent enough to contain the last event.
const TICKET_FRAGMENTS: &str = "\
fragment IssueTicket on Issue {
  titleHTML
  url
  createdAt
  author { login }
  labels { totalCount }
  assignees(first: 10) { totalCount nodes { login } }
  comments(last: 100) { nodes { createdAt author { login } } }
}
fragment PullRequestTicket on PullRequest {
  titleHTML
  url
  createdAt
  author { login }
  labels { totalCount }
  assignees(first: 10) { totalCount nodes { login } }
  comments(last: 100) { nodes { createdAt author { login } } }
  reviews(last: 100) { nodes { createdAt author { login } } }
}
";

const DIRECT_SEARCH_QUERY: &str = "\
query($searchQuery: String!, $pageSize: Int!) {
  search(type: ISSUE, query: $searchQuery, first: $pageSize) {
    nodes {
      __typename
      ...IssueTicket
      ...PullRequestTicket
    }
  }
}
";

const CANDIDATE_NUMBERS_QUERY: &str = "\
query($searchQuery: String!, $pageSize: Int!, $cursor: String) {
  search(type: ISSUE, query: $searchQuery, first: $pageSize, after: $cursor) {
    pageInfo { endCursor }
    nodes {
      __typename
      ... on Issue { number }
      ... on PullRequest { number }
    }
  }
}
";

#[derive(Clone)]
/// Public struct `GithubGraphqlClient` used across Vigil components.
pub struct GithubGraphqlClient {
    http: reqwest::Client,
    graphql_url: String,
    repo: RepoRef,
    retry_max_attempts: usize,
    retry_base_delay_ms: u64,
}

impl GithubGraphqlClient {
    pub fn new(
        api_base: &str,
        token: &str,
        repo: RepoRef,
        request_timeout_ms: u64,
        retry_max_attempts: usize,
        retry_base_delay_ms: u64,
    ) -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("vigil-triage"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let auth_header = format!("Bearer {}", token.trim());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&auth_header)
                .map_err(|_| FetchError::InvalidToken)?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()?;
        Ok(Self {
            http,
            graphql_url: format!("{}/graphql", api_base.trim_end_matches('/')),
            repo,
            retry_max_attempts: retry_max_attempts.max(1),
            retry_base_delay_ms: retry_base_delay_ms.max(1),
        })
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    fn search_query_for(&self, kind: TicketKind) -> String {
        let slug = self.repo.as_slug();
        match kind {
            TicketKind::Issue => {
                format!("repo:{slug} is:issue is:open no:label sort:created-desc")
            }
            TicketKind::PullRequest => {
                format!("repo:{slug} is:pr is:open no:label -is:draft sort:created-desc")
            }
        }
    }

    fn build_batched_lookup_query(&self, numbers: &[u64]) -> String {
        let mut selections = String::new();
        for (index, number) in numbers.iter().enumerate() {
            selections.push_str(&format!(
                "    t{index}: issueOrPullRequest(number: {number}) {{ __typename ...IssueTicket ...PullRequestTicket }}\n"
            ));
        }
        format!(
            "query {{\n  repository(owner: \"{}\", name: \"{}\") {{\n{selections}  }}\n}}\n{TICKET_FRAGMENTS}",
            self.repo.owner, self.repo.name
        )
    }

    /// POSTs one GraphQL document and returns its `data` object.
    ///
    /// Retryable statuses and transport errors get a bounded exponential
    /// backoff; GraphQL-level errors in a 200 response are never retried.
    async fn post_query(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<Value, FetchError> {
        let payload = json!({ "query": query, "variables": variables });
        let mut attempt = 0_usize;
        loop {
            attempt = attempt.saturating_add(1);
            let response = self
                .http
                .post(&self.graphql_url)
                .header(
                    "x-vigil-retry-attempt",
                    attempt.saturating_sub(1).to_string(),
                )
                .json(&payload)
                .send()
                .await;
            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let envelope = response.json::<Value>().await?;
                        return extract_data(operation, envelope);
                    }

                    let retry_after = parse_retry_after(response.headers());
                    let body = response.text().await.unwrap_or_default();
                    if attempt < self.retry_max_attempts
                        && is_retryable_github_status(status.as_u16())
                    {
                        tracing::debug!(
                            operation = operation,
                            status = status.as_u16(),
                            attempt = attempt,
                            "retrying github graphql call"
                        );
                        tokio::time::sleep(retry_delay(
                            self.retry_base_delay_ms,
                            attempt,
                            retry_after,
                        ))
                        .await;
                        continue;
                    }

                    return Err(FetchError::HttpStatus {
                        status: status.as_u16(),
                        body: truncate_for_error(&body, ERROR_BODY_PREVIEW_LEN),
                    });
                }
                Err(error) => {
                    if attempt < self.retry_max_attempts && is_retryable_transport_error(&error) {
                        tracing::debug!(
                            operation = operation,
                            attempt = attempt,
                            error = %error,
                            "retrying github graphql call after transport error"
                        );
                        tokio::time::sleep(retry_delay(self.retry_base_delay_ms, attempt, None))
                            .await;
                        continue;
                    }
                    return Err(FetchError::Http(error));
                }
            }
        }
    }
}

/// Splits a GraphQL envelope into its `data` payload, surfacing `errors[]`.
fn extract_data(operation: &str, mut envelope: Value) -> Result<Value, FetchError> {
    if let Some(errors) = envelope.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let message = errors
                .iter()
                .filter_map(|error| error.get("message").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ");
            let detail = if message.is_empty() {
                "unspecified graphql error".to_string()
            } else {
                message
            };
            return Err(FetchError::Graphql(format!("{operation}: {detail}")));
        }
    }
    let data = envelope
        .get_mut("data")
        .map(Value::take)
        .unwrap_or(Value::Null);
    if data.is_null() {
        return Err(FetchError::Graphql(format!(
            "{operation}: response carried no data"
        )));
    }
    Ok(data)
}

#[async_trait]
impl TicketSource for GithubGraphqlClient {
    async fn fetch_ticket_page(
        &self,
        kind: TicketKind,
        page_size: usize,
    ) -> Result<Vec<RawTicket>, FetchError> {
        let query = format!("{DIRECT_SEARCH_QUERY}{TICKET_FRAGMENTS}");
        let variables = json!({
            "searchQuery": self.search_query_for(kind),
            "pageSize": page_size,
        });
        let data = self.post_query("search tickets", &query, variables).await?;
        let nodes = data
            .get("search")
            .and_then(|search| search.get("nodes"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        nodes.iter().map(decode_ticket_node).collect()
    }

    async fn search_candidate_numbers(
        &self,
        kind: TicketKind,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<CandidatePage, FetchError> {
        let variables = json!({
            "searchQuery": self.search_query_for(kind),
            "pageSize": page_size,
            "cursor": cursor,
        });
        let data = self
            .post_query("search candidate numbers", CANDIDATE_NUMBERS_QUERY, variables)
            .await?;
        let search = data.get("search").cloned().unwrap_or(Value::Null);
        let nodes = search
            .get("nodes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut numbers = Vec::with_capacity(nodes.len());
        for node in &nodes {
            match node.get("number").and_then(Value::as_u64) {
                Some(number) => numbers.push(number),
                None => {
                    let type_name = node
                        .get("__typename")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    return Err(FetchError::UnknownTicketKind {
                        type_name: type_name.to_string(),
                    });
                }
            }
        }
        let next_cursor = search
            .get("pageInfo")
            .and_then(|info| info.get("endCursor"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(CandidatePage {
            numbers,
            next_cursor,
        })
    }

    async fn fetch_tickets_by_number(
        &self,
        numbers: &[u64],
    ) -> Result<Vec<RawTicket>, FetchError> {
        let query = self.build_batched_lookup_query(numbers);
        let data = self
            .post_query("fetch tickets by number", &query, json!({}))
            .await?;
        let repository = data.get("repository").cloned().unwrap_or(Value::Null);

        let mut tickets = Vec::with_capacity(numbers.len());
        for (index, number) in numbers.iter().enumerate() {
            match repository.get(format!("t{index}")) {
                Some(node) if !node.is_null() => tickets.push(decode_ticket_node(node)?),
                _ => {
                    // Deleted or transferred between the search and this
                    // lookup; there is no record left to triage.
                    tracing::warn!(
                        number = number,
                        "candidate ticket vanished before the batched lookup"
                    );
                }
            }
        }
        Ok(tickets)
    }
}
