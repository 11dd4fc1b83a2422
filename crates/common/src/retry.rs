use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

/// Bounded exponential backoff for remote fetches.
///
/// Defaults are sized for slow public hosts:
/// - 3 attempts with 250ms base delay
/// - Backoff capped at 2s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt (doubles each attempt)
    pub base_delay: Duration,
    /// Maximum delay cap (backoff won't exceed this)
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
        }
    }
}

/// Millisecond form of [`RetryPolicy`] used by the configuration layer.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Calculate delay for a given attempt using exponential backoff
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

/// Retry an async operation with exponential backoff.
///
/// Only errors for which `should_retry` returns true are retried; anything
/// else is returned immediately.
///
/// # Arguments
/// * `f` - Produces a fresh future for each attempt
/// * `policy` - Attempt count and delays
/// * `operation_name` - Human-readable name for logging
/// * `should_retry` - Classifies an error as transient
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    mut f: F,
    policy: &RetryPolicy,
    operation_name: &str,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt + 1 < max_attempts && should_retry(&e) => {
                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {}ms...",
                    operation_name,
                    attempt + 1,
                    max_attempts,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(
                    "{} failed after {} attempt(s): {}",
                    operation_name,
                    attempt + 1,
                    e
                );
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn test_exponential_backoff_calculation() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(250));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(1000));
        // 250ms * 2^3 = 2000ms, right at the cap
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(40), Duration::from_secs(2));
    }

    #[test]
    fn test_settings_conversion_clamps_attempts() {
        let settings = RetrySettings {
            max_attempts: 0,
            base_delay_ms: 10,
            max_delay_ms: 40,
        };
        let policy = RetryPolicy::from(&settings);
        assert_eq!(policy.max_attempts, 1, "At least one attempt is always made");
        assert_eq!(policy.base_delay, Duration::from_millis(10));
        assert_eq!(policy.max_delay, Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_retries_transient_errors_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result: Result<u32, String> = retry_with_backoff(
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 { Err("timeout".to_string()) } else { Ok(n) }
            },
            &fast_policy(5),
            "flaky fetch",
            |_| true,
        )
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result: Result<(), String> = retry_with_backoff(
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("connection refused".to_string())
            },
            &fast_policy(3),
            "dead host",
            |_| true,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result: Result<(), String> = retry_with_backoff(
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("not found".to_string())
            },
            &fast_policy(5),
            "lookup",
            |e| e != "not found",
        )
        .await;

        assert_eq!(result, Err("not found".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1, "Permanent errors stop immediately");
    }
}
