//! Error types for the AutoSaaz admin client

use thiserror::Error;

/// Result type alias for AutoSaaz client operations
pub type AutosaazResult<T> = Result<T, AutosaazError>;

/// Main error type for the AutoSaaz admin client
#[derive(Error, Debug, Clone)]
pub enum AutosaazError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network-layer failures (connection refused, DNS, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP error responses carrying the upstream status code
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Backend envelope reported failure (`success: false` or missing)
    #[error("{0}")]
    Api(String),

    /// The stored session token was rejected by the backend
    #[error("Session expired, please sign in again")]
    SessionExpired,

    /// Cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Request deadline elapsed before a response arrived
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Request was cancelled before completion
    #[error("Request was cancelled")]
    Cancelled,

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

impl AutosaazError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a new HTTP error from a status code and message
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a new backend envelope error
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api(message.into())
    }

    /// Create a new cache error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }

    /// Create a new timeout error
    pub const fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    /// Whether a retry attempt can reasonably succeed.
    ///
    /// Retryable: network-layer failures, HTTP 5xx responses from the
    /// upstream or its gateway, timeouts and cancellations. Everything else
    /// (4xx, envelope failures, configuration problems) fails on first
    /// occurrence.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Timeout { .. } => true,
            Self::Cancelled => true,
            Self::Http { status, message } => {
                matches!(status, 500 | 502 | 503 | 504) || {
                    let msg = message.to_lowercase();
                    msg.contains("bad gateway")
                        || msg.contains("gateway timeout")
                        || msg.contains("service unavailable")
                }
            }
            _ => false,
        }
    }
}

impl From<anyhow::Error> for AutosaazError {
    fn from(error: anyhow::Error) -> Self {
        Self::Other(error.to_string())
    }
}

impl From<std::io::Error> for AutosaazError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AutosaazError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<reqwest::Error> for AutosaazError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout { seconds: 0 }
        } else {
            Self::Network(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        for status in [500, 502, 503, 504] {
            assert!(AutosaazError::http(status, "upstream failure").is_retryable());
        }
    }

    #[test]
    fn test_client_errors_are_fatal() {
        for status in [400, 401, 403, 404, 422] {
            assert!(!AutosaazError::http(status, "client failure").is_retryable());
        }
    }

    #[test]
    fn test_gateway_branded_message_is_retryable() {
        let error = AutosaazError::http(520, "Bad Gateway from edge proxy");
        assert!(error.is_retryable());
    }

    #[test]
    fn test_network_and_timeout_are_retryable() {
        assert!(AutosaazError::network("connection refused").is_retryable());
        assert!(AutosaazError::timeout(30).is_retryable());
        assert!(AutosaazError::Cancelled.is_retryable());
    }

    #[test]
    fn test_envelope_failure_is_fatal() {
        assert!(!AutosaazError::api("Garage is already suspended").is_retryable());
        assert!(!AutosaazError::SessionExpired.is_retryable());
    }
}
