//! Request orchestration for the admin API
//!
//! [`ApiClient`] composes the pieces from `autosaaz-core` around each
//! logical operation: reads go cache → coalesced network call with retry →
//! cache populate; writes go straight to the network and invalidate the
//! resource families they touch. Resource methods live in the sibling
//! `resources` modules; everything here is shape-agnostic.


use autosaaz_core::cache::{CacheKey, RequestCache, ResourceKind, SweeperHandle};
use autosaaz_core::auth::TokenStore;
use autosaaz_core::config::ClientConfig;
use autosaaz_core::error::{AutosaazError, AutosaazResult};
use autosaaz_core::http::{self, ApiRequest, HttpTransport, ReqwestTransport};
use autosaaz_core::retry::{execute_with_retry, RetryPolicy};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::instrument;

type InflightResult = Result<Arc<serde_json::Value>, AutosaazError>;
type InflightFuture = Shared<BoxFuture<'static, InflightResult>>;

/// Client for the AutoSaaz admin backend.
///
/// One instance owns one cache scope, one session and one background
/// sweeper; dropping the client tears all of them down.
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<RequestCache>,
    tokens: TokenStore,
    retry: RetryPolicy,
    /// cache key -> the single network task serving all concurrent misses
    inflight: Arc<Mutex<HashMap<String, InflightFuture>>>,
    sweeper: SweeperHandle,
    cache_listener: JoinHandle<()>,
}

impl ApiClient {
    /// Create a client from configuration, with the reqwest transport
    pub async fn new(config: ClientConfig) -> AutosaazResult<Self> {
        config.validate()?;

        let tokens = TokenStore::new();
        let transport = ReqwestTransport::new(
            &config.base_url,
            &config.api_key,
            Arc::new(tokens.clone()),
            config.request_timeout,
        )?;

        Self::build(config, Arc::new(transport), tokens).await
    }

    /// Create a client over a custom transport (tests, instrumentation)
    pub async fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> AutosaazResult<Self> {
        Self::build(config, transport, TokenStore::new()).await
    }

    async fn build(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        tokens: TokenStore,
    ) -> AutosaazResult<Self> {
        let cache = if config.cache.enable_disk_cache {
            Arc::new(RequestCache::new(config.cache).await?)
        } else {
            Arc::new(RequestCache::memory_only(config.cache))
        };

        let cache_listener = cache.bind_session_events(&tokens);
        let sweeper = cache.start_sweeper();

        Ok(Self {
            transport,
            cache,
            tokens,
            retry: RetryPolicy::new(config.retry),
            inflight: Arc::new(Mutex::new(HashMap::new())),
            sweeper,
            cache_listener,
        })
    }

    /// The session token store backing this client
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// The request cache backing this client
    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    /// Store the session token obtained by the (external) sign-in flow
    pub fn sign_in(&self, token: impl Into<String>) {
        self.tokens.set_token(token);
    }

    /// Drop the session; clears the cache through the session event hook
    pub fn sign_out(&self) {
        self.tokens.clear();
    }

    /// Execute an idempotent read.
    ///
    /// A fresh cache entry is returned without touching the network.
    /// Concurrent misses for the same key share one network task; the task
    /// keeps running (and still populates the cache) even if every caller
    /// stops waiting. The network call runs under the client's retry
    /// policy.
    #[instrument(skip(self, request), fields(endpoint = %request.endpoint))]
    pub async fn get_cached(
        &self,
        kind: ResourceKind,
        request: ApiRequest,
    ) -> AutosaazResult<serde_json::Value> {
        let key = CacheKey::new(&request.endpoint, request.query.iter().cloned());

        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(key = %key, "cache hit");
            return Ok(hit);
        }

        let pending = self.join_inflight(&key, kind, request);
        pending.await.map(|value| (*value).clone())
    }

    /// Execute a state-mutating call.
    ///
    /// Never cached and never retried. On success, every cache entry whose
    /// key contains one of `invalidates` is removed, plus `detail_key`
    /// exactly when one is given. The caller supplies the patterns — which
    /// write touches which resource family is domain knowledge, not
    /// something the cache infers.
    #[instrument(skip(self, request, detail_key), fields(endpoint = %request.endpoint))]
    pub async fn execute_write(
        &self,
        request: ApiRequest,
        invalidates: &[&str],
        detail_key: Option<&CacheKey>,
    ) -> AutosaazResult<serde_json::Value> {
        let raw = self.transport.send(request).await?;
        let payload = match http::decode(raw) {
            Ok(payload) => payload,
            Err(error) => return Err(self.handle_session_expiry(error)),
        };

        for pattern in invalidates {
            self.cache.invalidate_pattern(pattern).await;
        }
        if let Some(key) = detail_key {
            self.cache.invalidate(key).await;
        }

        Ok(payload)
    }

    /// Join (or start) the single in-flight network task for `key`
    fn join_inflight(
        &self,
        key: &CacheKey,
        kind: ResourceKind,
        request: ApiRequest,
    ) -> InflightFuture {
        let mut inflight = self.inflight.lock();

        if let Some(pending) = inflight.get(&key.canonical) {
            tracing::debug!(key = %key, "joining in-flight request");
            return pending.clone();
        }

        let transport = Arc::clone(&self.transport);
        let cache = Arc::clone(&self.cache);
        let tokens = self.tokens.clone();
        let retry = self.retry.clone();
        let fetch_key = key.clone();

        let pending: InflightFuture = async move {
            fetch_and_store(transport, cache, tokens, retry, fetch_key, kind, request)
                .await
                .map(Arc::new)
        }
        .boxed()
        .shared();

        // the slot must exist before the fetch can resolve, so the driver's
        // removal below cannot race an unfinished insert
        inflight.insert(key.canonical.clone(), pending.clone());

        // the driver polls the shared fetch to completion even if every
        // caller abandons it, then frees the slot for the next miss
        let driver = pending.clone();
        let inflight_map = Arc::clone(&self.inflight);
        let canonical = key.canonical.clone();
        tokio::spawn(async move {
            let _ = driver.await;
            inflight_map.lock().remove(&canonical);
        });

        pending
    }

    fn handle_session_expiry(&self, error: AutosaazError) -> AutosaazError {
        if matches!(error, AutosaazError::SessionExpired) {
            // clearing the token broadcasts SignedOut, which empties the cache
            self.tokens.clear();
        }
        error
    }
}

impl Drop for ApiClient {
    fn drop(&mut self) {
        self.sweeper.shutdown();
        self.cache_listener.abort();
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("cache", &self.cache)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Network fetch + cache populate for one read, shared by all callers that
/// missed on the same key
async fn fetch_and_store(
    transport: Arc<dyn HttpTransport>,
    cache: Arc<RequestCache>,
    tokens: TokenStore,
    retry: RetryPolicy,
    key: CacheKey,
    kind: ResourceKind,
    request: ApiRequest,
) -> AutosaazResult<serde_json::Value> {
    let outcome = execute_with_retry(
        || {
            let transport = Arc::clone(&transport);
            let request = request.clone();
            async move {
                let raw = transport.send(request).await?;
                http::decode(raw)
            }
        },
        &retry,
    )
    .await;

    match outcome {
        Ok(payload) => {
            cache.set(&key, kind, payload.clone()).await;
            Ok(payload)
        }
        Err(AutosaazError::SessionExpired) => {
            tokens.clear();
            Err(AutosaazError::SessionExpired)
        }
        Err(error) => Err(error),
    }
}
