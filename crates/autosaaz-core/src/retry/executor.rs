//! Retry execution for transient failures
//!
//! Drives an arbitrary async operation through retry attempts with capped
//! exponential backoff. Classification of an error as retryable lives on the
//! policy so call sites can tighten or widen it.

use super::backoff::{delay_for_attempt, RetryConfig};
use crate::error::{AutosaazError, AutosaazResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Decides whether an error is worth another attempt
pub type RetryClassifier = dyn Fn(&AutosaazError) -> bool + Send + Sync;

/// Invoked before each backoff wait with `(attempt_number, error, delay)`
pub type RetryObserver = dyn Fn(u32, &AutosaazError, Duration) + Send + Sync;

/// Retry policy for a single logical operation.
///
/// Holds no state across invocations; a policy is constructed per call site
/// and may be shared freely between concurrent operations.
#[derive(Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    classifier: Arc<RetryClassifier>,
    observer: Option<Arc<RetryObserver>>,
}

impl RetryPolicy {
    /// Create a policy with the default classifier
    /// ([`AutosaazError::is_retryable`])
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            classifier: Arc::new(AutosaazError::is_retryable),
            observer: None,
        }
    }

    /// Replace the retry classifier
    pub fn with_classifier<C>(mut self, classifier: C) -> Self
    where
        C: Fn(&AutosaazError) -> bool + Send + Sync + 'static,
    {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Attach an observer invoked before each backoff wait
    pub fn with_observer<O>(mut self, observer: O) -> Self
    where
        O: Fn(u32, &AutosaazError, Duration) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// The timing configuration backing this policy
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Execute `operation` with retries according to `policy`.
///
/// The operation runs at most `max_retries + 1` times. A non-retryable error
/// is returned immediately; a retryable one waits out the backoff delay and
/// tries again. Whatever error the final attempt produced is returned
/// unchanged so callers always see the original failure.
///
/// Each attempt runs under the policy's per-attempt deadline when one is
/// configured; an elapsed deadline counts as a retryable timeout.
pub async fn execute_with_retry<T, F, Fut>(
    mut operation: F,
    policy: &RetryPolicy,
) -> AutosaazResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AutosaazResult<T>>,
{
    let max_retries = policy.config.max_retries;
    let mut last_error = None;

    for attempt in 0..=max_retries {
        let outcome = match policy.config.attempt_timeout {
            Some(deadline) => match tokio::time::timeout(deadline, operation()).await {
                Ok(result) => result,
                Err(_) => Err(AutosaazError::timeout(deadline.as_secs())),
            },
            None => operation().await,
        };

        match outcome {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!(attempt, "request succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) => {
                if !(policy.classifier)(&error) {
                    tracing::warn!(error = %error, "non-retryable error");
                    return Err(error);
                }

                if attempt < max_retries {
                    let delay = delay_for_attempt(attempt, &policy.config);

                    if let Some(observer) = &policy.observer {
                        observer(attempt + 1, &error, delay);
                    }

                    warn!(
                        attempt = attempt + 1,
                        max_attempts = max_retries + 1,
                        delay_secs = delay.as_secs_f64(),
                        error = %error,
                        "retrying after failure"
                    );

                    sleep(delay).await;
                    last_error = Some(error);
                } else {
                    tracing::error!(attempts = max_retries + 1, "all retry attempts exhausted");
                    last_error = Some(error);
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        AutosaazError::Other(format!(
            "All {} attempts failed without error details",
            max_retries + 1
        ))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig::default()
            .with_max_retries(max_retries)
            .with_base_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(5))
            .with_attempt_timeout(None)
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let policy = RetryPolicy::new(fast_config(3));
        let result: AutosaazResult<i32> = execute_with_retry(|| async { Ok(42) }, &policy).await;

        assert_eq!(result.ok(), Some(42));
    }

    #[tokio::test]
    async fn test_fatal_error_invokes_operation_exactly_once() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        let policy = RetryPolicy::new(fast_config(5));

        let result: AutosaazResult<i32> = execute_with_retry(
            || {
                let attempts = attempts_clone.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(AutosaazError::http(404, "User not found"))
                }
            },
            &policy,
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(AutosaazError::Http { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_exhaustion_invokes_operation_max_plus_one_times() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        let policy = RetryPolicy::new(fast_config(3));

        let result: AutosaazResult<i32> = execute_with_retry(
            || {
                let attempts = attempts_clone.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(AutosaazError::http(503, "Service Unavailable"))
                }
            },
            &policy,
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 4);

        // the original failure surfaces unchanged after exhaustion
        match result {
            Err(AutosaazError::Http { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service Unavailable");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_after_transient_failures() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        let policy = RetryPolicy::new(fast_config(5));

        let result: AutosaazResult<i32> = execute_with_retry(
            || {
                let attempts = attempts_clone.clone();
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(AutosaazError::network("connection reset"))
                    } else {
                        Ok(7)
                    }
                }
            },
            &policy,
        )
        .await;

        assert_eq!(result.ok(), Some(7));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_observer_sees_each_backoff() {
        let observed = Arc::new(AtomicU32::new(0));
        let observed_clone = observed.clone();
        let policy = RetryPolicy::new(fast_config(2)).with_observer(move |attempt, error, delay| {
            observed_clone.fetch_add(1, Ordering::SeqCst);
            assert!(attempt >= 1);
            assert!(error.is_retryable());
            assert!(delay <= Duration::from_millis(7));
        });

        let result: AutosaazResult<i32> =
            execute_with_retry(|| async { Err(AutosaazError::timeout(1)) }, &policy).await;

        assert!(result.is_err());
        // observer fires before each wait, not after the final failure
        assert_eq!(observed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_attempt_timeout_becomes_retryable_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        let config = fast_config(1).with_attempt_timeout(Some(Duration::from_millis(10)));
        let policy = RetryPolicy::new(config);

        let result: AutosaazResult<i32> = execute_with_retry(
            || {
                let attempts = attempts_clone.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(1)
                }
            },
            &policy,
        )
        .await;

        assert!(matches!(result, Err(AutosaazError::Timeout { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_custom_classifier_overrides_default() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        let policy = RetryPolicy::new(fast_config(3)).with_classifier(|_| false);

        let result: AutosaazResult<i32> = execute_with_retry(
            || {
                let attempts = attempts_clone.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(AutosaazError::network("connection refused"))
                }
            },
            &policy,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
