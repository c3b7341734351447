//! Retry classification and backoff decisions.
//!
//! Pure functions of (error context, attempt, policy); the shell owns
//! the actual sleeping and re-issuing of requests.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Retry policy for a single request.
///
/// The first try counts toward `max_attempts`, and the delay before
/// re-issuing attempt n+1 is `base_delay_ms * n` (linear backoff).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
        }
    }
}

fn transient_signature() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)connection reset|connection refused|dns error|failed to lookup address|timed? ?out").unwrap()
    })
}

/// Whether an error message matches a known transient-network
/// signature: connection reset, DNS failure, timeout, or connection
/// refused.
pub fn is_transient(message: &str) -> bool {
    transient_signature().is_match(message)
}

/// Whether a failure is worth retrying at all: transient network
/// errors and 5xx HTTP responses are; everything else is terminal.
pub fn is_retryable(status: Option<u16>, message: &str) -> bool {
    if let Some(status) = status {
        if (500..600).contains(&status) {
            return true;
        }
    }
    is_transient(message)
}

/// The full retry decision for a failed attempt. Attempts are
/// 1-indexed, so `attempt >= max_attempts` means the budget is spent.
pub fn should_retry(policy: &RetryPolicy, attempt: u32, status: Option<u16>, message: &str) -> bool {
    if attempt >= policy.max_attempts {
        return false;
    }
    is_retryable(status, message)
}

/// Delay to sleep after failed attempt n, before attempt n+1.
pub fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    Duration::from_millis(policy.base_delay_ms * u64::from(attempt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_signatures() {
        assert!(is_transient("Connection reset by peer"));
        assert!(is_transient("connection refused"));
        assert!(is_transient("dns error: no record found"));
        assert!(is_transient("failed to lookup address information"));
        assert!(is_transient("operation timed out"));
        assert!(is_transient("request timeout"));
        assert!(!is_transient("invalid JSON body"));
    }

    #[test]
    fn test_server_errors_are_retryable() {
        assert!(is_retryable(Some(500), "HTTP 500 while requesting x"));
        assert!(is_retryable(Some(503), "HTTP 503 while requesting x"));
        assert!(!is_retryable(Some(404), "HTTP 404 while requesting x"));
        assert!(!is_retryable(Some(400), "HTTP 400 while requesting x"));
    }

    #[test]
    fn test_transport_error_without_status() {
        assert!(is_retryable(None, "connection reset"));
        assert!(!is_retryable(None, "unexpected end of file"));
    }

    #[test]
    fn test_should_retry_respects_budget() {
        let policy = RetryPolicy::default();

        assert!(should_retry(&policy, 1, Some(500), ""));
        assert!(should_retry(&policy, 2, Some(500), ""));
        // The third attempt is the last one allowed.
        assert!(!should_retry(&policy, 3, Some(500), ""));
    }

    #[test]
    fn test_should_retry_non_retryable_short_circuits() {
        let policy = RetryPolicy::default();
        assert!(!should_retry(&policy, 1, Some(404), "HTTP 404"));
        assert!(!should_retry(&policy, 1, None, "bad payload"));
    }

    #[test]
    fn test_backoff_is_linear() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 500,
        };

        assert_eq!(backoff_delay(&policy, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(&policy, 2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(&policy, 3), Duration::from_millis(1500));
    }

    #[test]
    fn test_policy_defaults() {
        let policy: RetryPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, RetryPolicy::default());

        let policy: RetryPolicy =
            serde_json::from_str(r#"{"maxAttempts": 5, "baseDelayMs": 100}"#).unwrap();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay_ms, 100);
    }
}
