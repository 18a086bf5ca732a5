//! HTTP transport for the admin backend
//!
//! The orchestrator only needs "send this request, give me status and
//! body". Keeping that behind a trait lets tests substitute an in-process
//! fake and keeps reqwest out of everything above this module.

use crate::auth::SessionTokenProvider;
use crate::error::{AutosaazError, AutosaazResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// HTTP method for an API request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }

    /// GET-like requests are idempotent and safe to retry
    pub fn is_idempotent(self) -> bool {
        matches!(self, Self::Get)
    }
}

/// A request to one backend function endpoint
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Function name appended to the base URL (e.g. "get-garages")
    pub endpoint: String,
    pub method: Method,
    /// Query parameters, appended as-is (ordering handled by the cache key,
    /// not the wire format)
    pub query: Vec<(String, String)>,
    /// JSON body for write requests
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Build a GET request
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::Get,
            query: Vec::new(),
            body: None,
        }
    }

    /// Build a POST request
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::Post,
            query: Vec::new(),
            body: None,
        }
    }

    /// Add a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw response: status code plus unparsed body text
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Transport capability consumed by the orchestrator
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request, returning the raw response. A transport error is a
    /// network-layer failure; HTTP error statuses come back as responses.
    async fn send(&self, request: ApiRequest) -> AutosaazResult<RawResponse>;
}

/// Production transport over reqwest.
///
/// Attaches the static `apikey` header on every call plus, when a session
/// is active, `Authorization: Bearer <token>`. Both header names are fixed
/// by the backend and must not change.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    tokens: Arc<dyn SessionTokenProvider>,
}

impl ReqwestTransport {
    /// Create a transport for `base_url`, authenticating with `api_key` and
    /// per-session tokens from `tokens`
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        tokens: Arc<dyn SessionTokenProvider>,
        request_timeout: Duration,
    ) -> AutosaazResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| AutosaazError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            tokens,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> AutosaazResult<RawResponse> {
        let url = format!("{}/{}", self.base_url, request.endpoint);

        let mut builder = self
            .client
            .request(request.method.as_reqwest(), &url)
            .header("apikey", &self.api_key);

        if let Some(token) = self.tokens.session_token() {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
