//! Retry policy for transient transport failures.

use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;

use crate::error::{Error, Result};

/// Default maximum attempts per request (including the first).
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default base delay for exponential backoff.
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Maximum jitter added to each delay.
const MAX_JITTER: Duration = Duration::from_millis(250);

/// Retry policy applied to idempotent (HEAD/GET) requests.
///
/// Only server-side error statuses (502/503/504) and connection-level
/// failures are retried; client errors surface immediately. Delays double
/// per attempt with a little jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with custom limits. `max_attempts` includes the
    /// initial attempt and is clamped to at least 1.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Send a request, retrying transient failures up to the attempt budget.
    ///
    /// The builder must be cloneable (no streaming body), which holds for
    /// every HEAD/GET the pipeline issues. The final response is returned
    /// whatever its status; non-retryable statuses are the caller's to
    /// interpret.
    pub async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let mut attempt = 1;
        loop {
            let prepared = request
                .try_clone()
                .ok_or_else(|| Error::Download("request is not retryable".to_string()))?;

            let failure = match prepared.send().await {
                Ok(response) if is_retryable_status(response.status()) => {
                    format!("HTTP {}", response.status())
                }
                Ok(response) => return Ok(response),
                Err(e) if e.is_connect() || e.is_timeout() => e.to_string(),
                Err(e) => return Err(e.into()),
            };

            if attempt >= self.max_attempts {
                return Err(Error::Download(format!(
                    "giving up after {} attempts: {}",
                    attempt, failure
                )));
            }

            let delay = self.backoff_delay(attempt);
            tracing::debug!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                failure = %failure,
                "transient failure, will retry"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Delay before the retry following `attempt` (1-indexed):
    /// `base * 2^(attempt-1)` plus jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay * 2u32.saturating_pow(attempt - 1);
        let jitter_ms = rand::thread_rng().gen_range(0..=MAX_JITTER.as_millis() as u64);
        exponential + Duration::from_millis(jitter_ms)
    }
}

/// Server-side statuses worth retrying.
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::GATEWAY_TIMEOUT));

        assert!(!is_retryable_status(StatusCode::OK));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));

        let first = policy.backoff_delay(1);
        assert!(first >= Duration::from_secs(1) && first <= Duration::from_millis(1250));

        let third = policy.backoff_delay(3);
        assert!(third >= Duration::from_secs(4) && third <= Duration::from_millis(4250));
    }

    #[test]
    fn test_max_attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        assert_eq!(policy.max_attempts, 1);
    }

    #[tokio::test]
    async fn test_execute_retries_through_transient_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok"))
            .with_priority(10)
            .mount(&server)
            .await;

        let policy = RetryPolicy::new(5, Duration::from_millis(1));
        let client = reqwest::Client::new();
        let response = policy
            .execute(client.get(format!("{}/flaky", server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_execute_does_not_retry_client_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let policy = RetryPolicy::new(5, Duration::from_millis(1));
        let client = reqwest::Client::new();
        let response = policy
            .execute(client.get(format!("{}/missing", server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_execute_gives_up_after_budget() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(502))
            .expect(3)
            .mount(&server)
            .await;

        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let client = reqwest::Client::new();
        let result = policy
            .execute(client.get(format!("{}/down", server.uri())))
            .await;

        assert!(matches!(result, Err(Error::Download(_))));
    }
}
