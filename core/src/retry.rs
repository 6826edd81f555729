//! Bounded retry with linear backoff and a per-attempt timeout.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use crate::error::ApiError;

/// Backend endpoint a call targets. Used to label logs and exhaustion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Suggestions,
    Search,
    MedicineDetails,
    MedicinesByType,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Suggestions => "suggestions",
            Endpoint::Search => "search",
            Endpoint::MedicineDetails => "medicine_details",
            Endpoint::MedicinesByType => "medicines_by_type",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many times a call is attempted and how long each attempt may take.
///
/// After failed attempt `n` (1-based) the next attempt starts
/// `n * backoff_step` later. The last attempt's failure is returned without
/// waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(10),
            backoff_step: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following failed attempt `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy runs out of attempts.
///
/// Each attempt is raced against `policy.attempt_timeout`; an elapsed
/// attempt counts as [`ApiError::Timeout`]. Non-retryable errors are
/// returned untouched on the attempt that produced them. When the final
/// attempt fails with a retryable error the result is
/// [`ApiError::RetriesExhausted`] wrapping that last error.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    endpoint: Endpoint,
    mut op: F,
) -> Result<T, ApiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let outcome = match tokio::time::timeout(policy.attempt_timeout, op(attempt)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ApiError::Timeout(policy.attempt_timeout)),
        };

        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) => err,
        };

        if attempt >= max_attempts {
            error!(%endpoint, attempts = attempt, error = %err, "retries exhausted");
            return Err(ApiError::RetriesExhausted {
                endpoint,
                attempts: attempt,
                source: Box::new(err),
            });
        }

        let delay = policy.backoff(attempt);
        warn!(%endpoint, attempt, ?delay, error = %err, "attempt failed, retrying");
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();
        let result = with_retry(&RetryPolicy::default(), Endpoint::Search, |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(ApiError::Transport("connection reset".into()))
                } else {
                    Ok("found")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "found");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s after the first failure, 2s after the second.
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn three_failures_exhaust_without_extra_wait() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();
        let result: Result<(), _> =
            with_retry(&RetryPolicy::default(), Endpoint::MedicinesByType, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ApiError::Transport("refused".into())) }
            })
            .await;

        match result.unwrap_err() {
            ApiError::RetriesExhausted {
                endpoint,
                attempts,
                source,
            } => {
                assert_eq!(endpoint, Endpoint::MedicinesByType);
                assert_eq!(attempts, 3);
                assert!(matches!(*source, ApiError::Transport(_)));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_attempts_time_out() {
        let started = Instant::now();
        let result: Result<(), _> = with_retry(&RetryPolicy::default(), Endpoint::Suggestions, |_| {
            std::future::pending()
        })
        .await;

        match result.unwrap_err() {
            ApiError::RetriesExhausted { source, .. } => {
                assert!(matches!(*source, ApiError::Timeout(d) if d == Duration::from_secs(10)));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        // Three 10s timeouts plus 1s and 2s of backoff.
        assert_eq!(started.elapsed(), Duration::from_secs(33));
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_returns_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&RetryPolicy::default(), Endpoint::Search, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ApiError::Http {
                    status: 500,
                    detail: "boom".into(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(ApiError::Http { status: 500, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
    }
}
