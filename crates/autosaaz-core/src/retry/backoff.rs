//! Backoff delays for retry attempts
//!
//! Capped exponential backoff with symmetric jitter.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Jitter applied around the exponential delay, as a fraction of it.
pub const JITTER_RATIO: f64 = 0.25;

/// Configuration for retry timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Number of retries after the initial attempt
    pub max_retries: u32,
    /// Delay before the first retry
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
    /// Upper bound on the backoff curve
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
    /// Deadline for each individual attempt (None disables it)
    #[serde(default, with = "humantime_serde")]
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            attempt_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl RetryConfig {
    /// Create a config that never retries
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Set the number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the upper bound on the backoff curve
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the per-attempt deadline
    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }
}

/// Compute the delay before retry number `attempt` (0-indexed).
///
/// The un-jittered midpoint is `min(base_delay * 2^attempt, max_delay)`;
/// the result is perturbed by a uniform factor in ±[`JITTER_RATIO`] of that
/// midpoint so concurrent clients do not retry in lockstep, then floored to
/// whole milliseconds. The first retry (`attempt = 0`) is jittered too.
pub fn delay_for_attempt(attempt: u32, config: &RetryConfig) -> Duration {
    let factor = rand::thread_rng().gen_range(-JITTER_RATIO..=JITTER_RATIO);
    delay_with_jitter_factor(attempt, config, factor)
}

/// Deterministic core of [`delay_for_attempt`]: `factor` must lie in
/// ±[`JITTER_RATIO`].
pub(crate) fn delay_with_jitter_factor(
    attempt: u32,
    config: &RetryConfig,
    factor: f64,
) -> Duration {
    let exponential = config.base_delay.as_secs_f64() * 2f64.powi(attempt as i32);
    let midpoint = exponential.min(config.max_delay.as_secs_f64());
    let jittered = midpoint * (1.0 + factor);

    Duration::from_millis((jittered.max(0.0) * 1000.0).floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_ms: u64, max_ms: u64) -> RetryConfig {
        RetryConfig::default()
            .with_base_delay(Duration::from_millis(base_ms))
            .with_max_delay(Duration::from_millis(max_ms))
    }

    #[test]
    fn test_unjittered_midpoint_doubles_until_cap() {
        let config = config(100, 10_000);

        assert_eq!(
            delay_with_jitter_factor(0, &config, 0.0),
            Duration::from_millis(100)
        );
        assert_eq!(
            delay_with_jitter_factor(1, &config, 0.0),
            Duration::from_millis(200)
        );
        assert_eq!(
            delay_with_jitter_factor(2, &config, 0.0),
            Duration::from_millis(400)
        );
        assert_eq!(
            delay_with_jitter_factor(3, &config, 0.0),
            Duration::from_millis(800)
        );
    }

    #[test]
    fn test_midpoint_capped_at_max_delay() {
        let config = config(1_000, 5_000);

        // 2^10 seconds is far past the cap
        assert_eq!(
            delay_with_jitter_factor(10, &config, 0.0),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_jitter_bounds_hold_for_all_attempts() {
        let config = config(250, 4_000);
        let upper = Duration::from_secs_f64(4.0 * (1.0 + JITTER_RATIO));

        for attempt in 0..16 {
            for factor in [-JITTER_RATIO, -0.1, 0.0, 0.1, JITTER_RATIO] {
                let delay = delay_with_jitter_factor(attempt, &config, factor);
                assert!(delay <= upper, "attempt {attempt} factor {factor}");
            }
            let sampled = delay_for_attempt(attempt, &config);
            assert!(sampled <= upper);
        }
    }

    #[test]
    fn test_first_retry_is_jittered() {
        let config = config(1_000, 5_000);

        assert_eq!(
            delay_with_jitter_factor(0, &config, JITTER_RATIO),
            Duration::from_millis(1_250)
        );
        assert_eq!(
            delay_with_jitter_factor(0, &config, -JITTER_RATIO),
            Duration::from_millis(750)
        );
    }

    #[test]
    fn test_midpoint_is_monotonic_up_to_cap() {
        let config = config(100, 60_000);
        let mut previous = Duration::ZERO;

        for attempt in 0..20 {
            let midpoint = delay_with_jitter_factor(attempt, &config, 0.0);
            assert!(midpoint >= previous);
            previous = midpoint;
        }
    }
}
