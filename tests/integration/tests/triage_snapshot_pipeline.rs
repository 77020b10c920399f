use chrono::{DateTime, Utc};
use httpmock::prelude::*;
use serde_json::{json, Value};
use vigil_github::{
    build_triage_snapshot, FetchError, FetchStrategy, GithubGraphqlClient, PipelineOptions,
    RepoRef,
};
use vigil_tickets::TriageRegistry;

fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("timestamp")
        .with_timezone(&Utc)
}

fn test_client(api_base: &str) -> GithubGraphqlClient {
    GithubGraphqlClient::new(
        api_base,
        "test-token",
        RepoRef {
            owner: "acme".to_string(),
            name: "widget".to_string(),
        },
        5_000,
        2,
        1,
    )
    .expect("client")
}

fn test_registry() -> TriageRegistry {
    TriageRegistry::from_lists(["maintainer-a"], ["release-bot"])
}

/// Pipeline options pinned to Friday noon of the fixture week, which starts
/// Monday 2024-06-03.
fn test_options(strategy: FetchStrategy) -> PipelineOptions {
    let mut options = PipelineOptions::new("acme/widget");
    options.strategy = strategy;
    options.now_override = Some(ts("2024-06-07T12:00:00Z"));
    options
}

fn issue_node(url: &str, author: Value, created_at: &str, comments: Value) -> Value {
    json!({
        "__typename": "Issue",
        "titleHTML": "Example issue",
        "url": url,
        "createdAt": created_at,
        "author": author,
        "labels": { "totalCount": 0 },
        "assignees": { "totalCount": 1, "nodes": [ { "login": "maintainer-a" } ] },
        "comments": { "nodes": comments },
    })
}

fn pull_node(url: &str, author: Value, created_at: &str, comments: Value, reviews: Value) -> Value {
    json!({
        "__typename": "PullRequest",
        "titleHTML": "Example pull request",
        "url": url,
        "createdAt": created_at,
        "author": author,
        "labels": { "totalCount": 0 },
        "assignees": { "totalCount": 0, "nodes": [] },
        "comments": { "nodes": comments },
        "reviews": { "nodes": reviews },
    })
}

fn fixture_issue_nodes() -> Value {
    json!([
        // Last word from a maintainer four business days before the pinned
        // clock: no attention needed, but stale.
        issue_node(
            "https://github.com/acme/widget/issues/1",
            json!({ "login": "reporter" }),
            "2024-06-03T10:00:00Z",
            json!([
                { "createdAt": "2024-06-04T09:00:00Z", "author": { "login": "release-bot" } },
                { "createdAt": "2024-06-03T11:00:00Z", "author": { "login": "maintainer-a" } }
            ]),
        ),
        // Out-of-order comments and a deleted-account author; last word from
        // a contributor one business day back.
        issue_node(
            "https://github.com/acme/widget/issues/2",
            json!({ "login": "carol" }),
            "2024-06-05T09:00:00Z",
            json!([
                { "createdAt": "2024-06-06T10:00:00Z", "author": { "login": "dave" } },
                { "createdAt": "2024-06-05T15:00:00Z", "author": null }
            ]),
        ),
        // Bot-authored with no human follow-up; dropped from the snapshot.
        issue_node(
            "https://github.com/acme/widget/issues/3",
            json!({ "login": "release-bot" }),
            "2024-06-03T08:00:00Z",
            json!([]),
        ),
    ])
}

fn fixture_pull_nodes() -> Value {
    json!([pull_node(
        "https://github.com/acme/widget/pull/4",
        json!({ "login": "contributor" }),
        "2024-06-04T08:00:00Z",
        json!([
            { "createdAt": "2024-06-05T10:00:00Z", "author": { "login": "release-bot" } }
        ]),
        json!([
            { "createdAt": "2024-06-06T09:00:00Z", "author": { "login": "maintainer-a" } }
        ]),
    )])
}

#[tokio::test]
async fn direct_search_produces_classified_snapshot() {
    let server = MockServer::start();
    let issues_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/graphql")
            .header("authorization", "Bearer test-token")
            .body_includes("is:issue");
        then.status(200)
            .json_body(json!({ "data": { "search": { "nodes": fixture_issue_nodes() } } }));
    });
    let pulls_mock = server.mock(|when, then| {
        when.method(POST).path("/graphql").body_includes("is:pr");
        then.status(200)
            .json_body(json!({ "data": { "search": { "nodes": fixture_pull_nodes() } } }));
    });

    let client = test_client(&server.base_url());
    let snapshot = build_triage_snapshot(
        &client,
        &test_registry(),
        &test_options(FetchStrategy::DirectSearch),
    )
    .await
    .expect("snapshot");

    issues_mock.assert();
    pulls_mock.assert();

    assert_eq!(snapshot.schema_version, 1);
    assert_eq!(snapshot.repo, "acme/widget");
    assert_eq!(snapshot.generated_at, ts("2024-06-07T12:00:00Z"));

    // The bot-only issue is dropped; the two human tickets survive.
    assert_eq!(snapshot.issues.len(), 2);
    assert_eq!(snapshot.pull_requests.len(), 1);

    let first = &snapshot.issues[0];
    assert_eq!(first.ticket.url, "https://github.com/acme/widget/issues/1");
    let authors: Vec<&str> = first
        .ticket
        .comments
        .iter()
        .map(|event| event.author.as_str())
        .collect();
    assert_eq!(authors, vec!["reporter", "maintainer-a"]);
    assert_eq!(first.ticket.assignees, vec!["maintainer-a"]);
    assert!(!first.flags.requires_attention);
    assert!(first.flags.is_stale);

    let second = &snapshot.issues[1];
    let authors: Vec<&str> = second
        .ticket
        .comments
        .iter()
        .map(|event| event.author.as_str())
        .collect();
    assert_eq!(authors, vec!["carol", "ghost", "dave"]);
    assert!(second.flags.requires_attention);
    assert!(!second.flags.is_stale);

    let pull = &snapshot.pull_requests[0];
    let authors: Vec<&str> = pull
        .ticket
        .comments
        .iter()
        .map(|event| event.author.as_str())
        .collect();
    assert_eq!(authors, vec!["contributor", "maintainer-a"]);
    assert!(!pull.flags.requires_attention);
    assert!(!pull.flags.is_stale);

    // Merged timelines stay sorted and never keep bot entries.
    for record in snapshot.issues.iter().chain(snapshot.pull_requests.iter()) {
        assert!(!record.ticket.comments.is_empty());
        let timestamps: Vec<_> = record
            .ticket
            .comments
            .iter()
            .map(|event| event.created_at)
            .collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        assert_eq!(timestamps, sorted);
        assert!(record
            .ticket
            .comments
            .iter()
            .all(|event| event.author != "release-bot"));
    }
}

#[tokio::test]
async fn numbered_candidates_batches_one_lookup() {
    let server = MockServer::start();
    let issue_numbers_mock = server.mock(|when, then| {
        when.method(POST).path("/graphql").body_includes("is:issue");
        then.status(200).json_body(json!({
            "data": {
                "search": {
                    "pageInfo": { "endCursor": "cursor-0" },
                    "nodes": [ { "__typename": "Issue", "number": 1 } ]
                }
            }
        }));
    });
    let pull_numbers_mock = server.mock(|when, then| {
        when.method(POST).path("/graphql").body_includes("is:pr");
        then.status(200).json_body(json!({
            "data": {
                "search": { "pageInfo": { "endCursor": null }, "nodes": [] }
            }
        }));
    });
    let batched_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/graphql")
            .body_includes("issueOrPullRequest");
        then.status(200).json_body(json!({
            "data": {
                "repository": {
                    "t0": issue_node(
                        "https://github.com/acme/widget/issues/1",
                        json!({ "login": "reporter" }),
                        "2024-06-03T10:00:00Z",
                        json!([
                            { "createdAt": "2024-06-03T11:00:00Z", "author": { "login": "maintainer-a" } }
                        ]),
                    )
                }
            }
        }));
    });

    let client = test_client(&server.base_url());
    let snapshot = build_triage_snapshot(
        &client,
        &test_registry(),
        &test_options(FetchStrategy::NumberedCandidates),
    )
    .await
    .expect("snapshot");

    issue_numbers_mock.assert();
    pull_numbers_mock.assert();
    // An empty pull-request candidate set never issues a batched lookup.
    batched_mock.assert_hits(1);

    assert_eq!(snapshot.issues.len(), 1);
    assert!(snapshot.pull_requests.is_empty());
    assert_eq!(
        snapshot.issues[0].ticket.url,
        "https://github.com/acme/widget/issues/1"
    );
    assert!(snapshot.issues[0].flags.is_stale);
}

#[tokio::test]
async fn persistent_server_failure_aborts_the_run() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/graphql");
        then.status(500).body("internal error");
    });

    let client = test_client(&server.base_url());
    let error = build_triage_snapshot(
        &client,
        &test_registry(),
        &test_options(FetchStrategy::DirectSearch),
    )
    .await
    .expect_err("must fail");

    match error {
        FetchError::HttpStatus { status, .. } => assert_eq!(status, 500),
        other => panic!("unexpected error: {other}"),
    }
}
