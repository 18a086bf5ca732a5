//! AutoSaaz Admin Client Core
//!
//! Infrastructure for talking to the AutoSaaz admin backend: a two-tier
//! request cache with per-entry expiry, retry with capped exponential
//! backoff, the HTTP transport and response envelope, and session state.
//! The request orchestrator built on top of these lives in `autosaaz-sdk`.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod retry;

// Re-export commonly used types
pub use auth::{SessionEvent, SessionTokenProvider, TokenStore};
pub use cache::{CacheConfig, CacheKey, RequestCache, ResourceKind, SweeperHandle};
pub use config::ClientConfig;
pub use error::{AutosaazError, AutosaazResult};
pub use http::{ApiRequest, HttpTransport, Method, RawResponse, ReqwestTransport};
pub use retry::{execute_with_retry, RetryConfig, RetryPolicy};
