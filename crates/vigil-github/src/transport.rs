use std::time::Duration;

use chrono::{DateTime, Utc};

const MAX_BACKOFF_SHIFT: usize = 6;

pub fn is_retryable_github_status(status: u16) -> bool {
    status == 408 || status == 409 || status == 425 || status == 429 || status >= 500
}

pub fn is_retryable_transport_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request() || error.is_body()
}

/// Parses a Retry-After header carrying either delay seconds or an HTTP date.
pub fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    let raw = headers.get("retry-after")?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(seconds) = raw.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let retry_at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
    let delay_ms = retry_at.signed_duration_since(Utc::now()).num_milliseconds();
    if delay_ms <= 0 {
        return Some(Duration::ZERO);
    }
    u64::try_from(delay_ms).ok().map(Duration::from_millis)
}

/// Exponential backoff from `base_delay_ms`, floored by the server's
/// Retry-After hint when one is present.
pub fn retry_delay(base_delay_ms: u64, attempt: usize, retry_after: Option<Duration>) -> Duration {
    let shift = attempt.min(MAX_BACKOFF_SHIFT);
    let backoff = Duration::from_millis(base_delay_ms.max(1).saturating_mul(1_u64 << shift));
    match retry_after {
        Some(hint) => backoff.max(hint),
        None => backoff,
    }
}

/// Truncates response bodies quoted in error messages.
pub fn truncate_for_error(body: &str, max_len: usize) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= max_len {
        return trimmed.to_string();
    }
    let mut cut = max_len;
    while cut > 0 && !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &trimmed[..cut])
}
