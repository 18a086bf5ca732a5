//! Retry with backoff for transient request failures
//!
//! The executor makes no assumptions about what it runs; the orchestrator in
//! `autosaaz-sdk` wraps idempotent reads in it and leaves writes alone.

pub mod backoff;
pub mod executor;

pub use backoff::{delay_for_attempt, RetryConfig, JITTER_RATIO};
pub use executor::{execute_with_retry, RetryClassifier, RetryObserver, RetryPolicy};
