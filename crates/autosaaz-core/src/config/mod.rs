//! Client configuration

use crate::cache::CacheConfig;
use crate::error::{AutosaazError, AutosaazResult};
use crate::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the admin API client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend functions host
    pub base_url: String,
    /// Static API identity credential, sent on every request
    pub api_key: String,
    /// Socket-level timeout applied by the HTTP client
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Retry timing for idempotent reads
    pub retry: RetryConfig,
    /// Request cache settings
    pub cache: CacheConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.autosaaz.com/functions/v1".to_string(),
            api_key: String::new(),
            request_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with the given API key
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the retry configuration
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the cache configuration
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Set the socket-level request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check the config is usable before a client is built from it
    pub fn validate(&self) -> AutosaazResult<()> {
        if self.base_url.is_empty() {
            return Err(AutosaazError::config("base_url must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AutosaazError::config(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        if self.api_key.is_empty() {
            return Err(AutosaazError::config("api_key must not be empty"));
        }
        Ok(())
    }
}

/// Load configuration from `AUTOSAAZ_*` environment variables, starting from
/// defaults.
///
/// Recognized variables: `AUTOSAAZ_BASE_URL`, `AUTOSAAZ_API_KEY`,
/// `AUTOSAAZ_REQUEST_TIMEOUT_SECS`, `AUTOSAAZ_MAX_RETRIES`,
/// `AUTOSAAZ_CACHE_DIR`, `AUTOSAAZ_DISABLE_DISK_CACHE`.
pub fn load_from_env() -> AutosaazResult<ClientConfig> {
    let mut config = ClientConfig::default();

    if let Ok(base_url) = env::var("AUTOSAAZ_BASE_URL") {
        config.base_url = base_url;
    }
    if let Ok(api_key) = env::var("AUTOSAAZ_API_KEY") {
        config.api_key = api_key;
    }

    if let Ok(timeout) = env::var("AUTOSAAZ_REQUEST_TIMEOUT_SECS") {
        let seconds: u64 = timeout
            .parse()
            .map_err(|_| AutosaazError::config("Invalid AUTOSAAZ_REQUEST_TIMEOUT_SECS value"))?;
        config.request_timeout = Duration::from_secs(seconds);
    }

    if let Ok(max_retries) = env::var("AUTOSAAZ_MAX_RETRIES") {
        config.retry.max_retries = max_retries
            .parse()
            .map_err(|_| AutosaazError::config("Invalid AUTOSAAZ_MAX_RETRIES value"))?;
    }

    if let Ok(dir) = env::var("AUTOSAAZ_CACHE_DIR") {
        config.cache.disk_cache_dir = Some(PathBuf::from(dir));
    }
    if let Ok(disabled) = env::var("AUTOSAAZ_DISABLE_DISK_CACHE") {
        config.cache.enable_disk_cache = !disabled.parse().unwrap_or(false);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_fails_validation_without_api_key() {
        assert!(ClientConfig::default().validate().is_err());
    }

    #[test]
    fn test_explicit_config_validates() {
        let config = ClientConfig::new("https://api.example.com", "anon-key");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_http_base_url_is_rejected() {
        let config = ClientConfig::new("ftp://api.example.com", "anon-key");
        assert!(config.validate().is_err());
    }
}
