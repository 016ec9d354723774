use crate::utils::error::Result;
use std::future::Future;
use std::time::Duration;

/// Fixed-delay retry: up to `max_attempts` tries, `delay` between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// the attempts run out. The closure receives the 1-based attempt number.
pub async fn with_fixed_retry<F, Fut, T>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(item = label, attempts = attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                tracing::warn!(
                    item = label,
                    error = %e,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    "Attempt failed, retrying"
                );
                println!(
                    "  🔁 Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt, policy.max_attempts, e, policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::error!(item = label, error = %e, attempts = attempt, "All attempts exhausted");
                } else {
                    tracing::error!(item = label, error = %e, "Non-retryable failure");
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use std::cell::Cell;
    use std::time::Instant;

    fn transient() -> EtlError {
        EtlError::HttpStatusError {
            url: "http://example.com/a.jsonl".to_string(),
            status: 503,
        }
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        let result = with_fixed_retry(&policy, "a", |_| {
            calls.set(calls.get() + 1);
            async { Ok::<_, EtlError>(7) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(5, Duration::from_millis(1));

        let result = with_fixed_retry(&policy, "a", |attempt| {
            calls.set(calls.get() + 1);
            async move {
                if attempt < 3 {
                    Err(transient())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts_with_fixed_delay() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(20));
        let started = Instant::now();

        let result: Result<()> = with_fixed_retry(&policy, "a", |_| {
            calls.set(calls.get() + 1);
            async { Err(transient()) }
        })
        .await;

        assert!(matches!(result, Err(EtlError::HttpStatusError { status: 503, .. })));
        assert_eq!(calls.get(), 3);
        // two waits between three attempts
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(4, Duration::from_millis(1));

        let result: Result<()> = with_fixed_retry(&policy, "a", |_| {
            calls.set(calls.get() + 1);
            async { Err(EtlError::processing("bad body")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_policy_never_allows_zero_attempts() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
