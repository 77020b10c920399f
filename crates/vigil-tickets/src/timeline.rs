use crate::activity::ActivityEvent;
use crate::registry::TriageRegistry;

/// Merges a ticket's activity sources into one chronological timeline.
///
/// The candidate list is the creation event, then comments, then reviews
/// (review events exist only for pull requests; issues pass an empty list).
/// Events authored by registry bots are dropped, then the list is stable
/// sorted ascending by timestamp, so equal timestamps keep their encounter
/// order and the creation event leads any tie at the ticket's birth instant.
///
/// Comment and review inputs are bounded recency windows supplied by the
/// fetch layer; this function never paginates nested activity itself.
pub fn merge_ticket_timeline(
    creation: ActivityEvent,
    comments: Vec<ActivityEvent>,
    reviews: Vec<ActivityEvent>,
    registry: &TriageRegistry,
) -> Vec<ActivityEvent> {
    let mut events = Vec::with_capacity(1 + comments.len() + reviews.len());
    events.push(creation);
    events.extend(comments);
    events.extend(reviews);
    events.retain(|event| !registry.is_bot(&event.author));
    events.sort_by_key(|event| event.created_at);
    events
}

#[cfg(test)]
mod tests {
    use super::merge_ticket_timeline;
    use crate::activity::ActivityEvent;
    use crate::registry::TriageRegistry;
    use chrono::{DateTime, Utc};

    fn ts(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    fn event(author: &str, raw_ts: &str) -> ActivityEvent {
        ActivityEvent {
            author: author.to_string(),
            created_at: ts(raw_ts),
        }
    }

    #[test]
    fn functional_merge_sorts_creation_comments_and_reviews_without_bots() {
        let registry = TriageRegistry::from_lists([], ["triage-bot"]);
        let creation = event("alice", "2026-01-01T00:00:00Z");
        let comments = vec![
            event("bob", "2026-01-03T00:00:00Z"),
            event("carol", "2026-01-02T00:00:00Z"),
            event("triage-bot", "2026-01-02T12:00:00Z"),
        ];
        let reviews = vec![event("dave", "2026-01-04T00:00:00Z")];

        let timeline = merge_ticket_timeline(creation, comments, reviews, &registry);

        let authors: Vec<&str> = timeline
            .iter()
            .map(|entry| entry.author.as_str())
            .collect();
        assert_eq!(authors, vec!["alice", "carol", "bob", "dave"]);
        assert!(timeline
            .windows(2)
            .all(|pair| pair[0].created_at <= pair[1].created_at));
    }

    #[test]
    fn unit_merge_handles_issue_without_reviews() {
        let registry = TriageRegistry::default();
        let creation = event("alice", "2026-01-01T00:00:00Z");
        let timeline = merge_ticket_timeline(creation, Vec::new(), Vec::new(), &registry);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].author, "alice");
    }

    #[test]
    fn unit_merge_keeps_encounter_order_for_equal_timestamps() {
        let registry = TriageRegistry::default();
        let creation = event("alice", "2026-01-01T00:00:00Z");
        let comments = vec![
            event("bob", "2026-01-01T00:00:00Z"),
            event("carol", "2026-01-01T00:00:00Z"),
        ];

        let timeline = merge_ticket_timeline(creation, comments, Vec::new(), &registry);

        let authors: Vec<&str> = timeline
            .iter()
            .map(|entry| entry.author.as_str())
            .collect();
        assert_eq!(authors, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn regression_merge_of_bot_authored_ticket_can_be_empty() {
        let registry = TriageRegistry::from_lists([], ["release-bot"]);
        let creation = event("release-bot", "2026-01-01T00:00:00Z");
        let comments = vec![event("release-bot", "2026-01-02T00:00:00Z")];

        let timeline = merge_ticket_timeline(creation, comments, Vec::new(), &registry);
        assert!(timeline.is_empty());
    }
}
