//! Request cache for the admin backend
//!
//! Two tiers: a bounded in-memory map that receives every entry, and a
//! persistent file-backed tier that only receives entries whose resource
//! kind is safe to keep across restarts. Caching is strictly a performance
//! layer — every operation on [`RequestCache`] is infallible from the
//! caller's point of view, and a failure inside either tier degrades to a
//! miss or a dropped write.

pub mod storage;
pub mod types;

#[cfg(test)]
mod tests;

pub use storage::{CacheStorage, DiskStorage, MemoryStorage};
pub use types::{
    CacheConfig, CacheEntry, CacheKey, CacheStatistics, ResourceKind, StorageStatistics, TtlTable,
};

use crate::auth::{SessionEvent, TokenStore};
use crate::error::AutosaazResult;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Two-tier request cache with per-entry expiry.
///
/// Constructed per client and injected where needed; there is no process
/// global. Drop the instance (and cancel its sweeper) to tear it down.
#[derive(Debug)]
pub struct RequestCache {
    memory: MemoryStorage,
    disk: Option<DiskStorage>,
    config: CacheConfig,
}

impl RequestCache {
    /// Create a cache with both tiers, scanning the persistent tier's
    /// directory for entries surviving from earlier runs.
    pub async fn new(config: CacheConfig) -> AutosaazResult<Self> {
        let memory = MemoryStorage::new(config.memory_capacity);

        let disk = if config.enable_disk_cache {
            match config.resolve_disk_dir() {
                Some(dir) => {
                    let disk = DiskStorage::new(dir, config.disk_capacity)?;
                    disk.initialize().await?;
                    Some(disk)
                }
                None => None,
            }
        } else {
            None
        };

        Ok(Self {
            memory,
            disk,
            config,
        })
    }

    /// Create a cache with the memory tier only
    pub fn memory_only(config: CacheConfig) -> Self {
        let memory = MemoryStorage::new(config.memory_capacity);
        Self {
            memory,
            disk: None,
            config,
        }
    }

    /// Look up a payload. Expired entries count as absent and are purged
    /// from whichever tier held them. A persistent-tier hit is promoted to
    /// the memory tier.
    pub async fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        if let Ok(Some(entry)) = self.memory.get(key).await {
            return Some(entry.data);
        }

        let disk = self.disk.as_ref()?;
        match disk.get(key).await {
            Ok(Some(entry)) => {
                let _ = self.memory.set(key, entry.clone()).await;
                Some(entry.data)
            }
            _ => None,
        }
    }

    /// Store a payload under `key`, with TTL and tier chosen by `kind`.
    ///
    /// The memory tier always receives the entry. The persistent tier only
    /// receives kinds that are safe to keep across restarts; a quota or
    /// write failure there triggers one expiry sweep and one more write
    /// before the write is dropped. Nothing propagates to the caller.
    pub async fn set(&self, key: &CacheKey, kind: ResourceKind, data: serde_json::Value) {
        let ttl = self.config.ttl.ttl_for(kind);
        let entry = CacheEntry::new(key, data, ttl);

        let _ = self.memory.set(key, entry.clone()).await;

        if !kind.is_persistent() {
            return;
        }
        let Some(disk) = &self.disk else {
            return;
        };

        if let Err(first) = disk.set(key, entry.clone()).await {
            let _ = disk.cleanup_expired().await;
            if let Err(second) = disk.set(key, entry).await {
                debug!(key = %key, first = %first, second = %second, "dropping persistent cache write");
            }
        }
    }

    /// Remove the entry for an exact key from both tiers
    pub async fn invalidate(&self, key: &CacheKey) {
        let _ = self.memory.remove(key).await;
        if let Some(disk) = &self.disk {
            let _ = disk.remove(key).await;
        }
    }

    /// Remove every entry whose canonical key contains `fragment`, in both
    /// tiers
    pub async fn invalidate_pattern(&self, fragment: &str) {
        let memory_removed = self.memory.remove_matching(fragment).await.unwrap_or(0);
        let disk_removed = match &self.disk {
            Some(disk) => disk.remove_matching(fragment).await.unwrap_or(0),
            None => 0,
        };

        debug!(
            fragment,
            memory_removed, disk_removed, "invalidated cache entries by pattern"
        );
    }

    /// Remove every entry in both tiers
    pub async fn clear(&self) {
        let _ = self.memory.clear().await;
        if let Some(disk) = &self.disk {
            let _ = disk.clear().await;
        }
    }

    /// Purge expired entries from both tiers
    pub async fn cleanup_expired(&self) {
        let _ = self.memory.cleanup_expired().await;
        if let Some(disk) = &self.disk {
            let _ = disk.cleanup_expired().await;
        }
    }

    /// Per-tier counters
    pub async fn statistics(&self) -> CacheStatistics {
        let memory_stats = self.memory.statistics().await;
        let disk_stats = match &self.disk {
            Some(disk) => Some(disk.statistics().await),
            None => None,
        };

        CacheStatistics {
            memory_stats,
            disk_stats,
        }
    }

    /// The configuration this cache was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Spawn the background sweep purging expired entries every
    /// `sweep_interval`, bounding growth from keys that are written often
    /// but read rarely.
    pub fn start_sweeper(self: &Arc<Self>) -> SweeperHandle {
        let token = CancellationToken::new();
        let child = token.clone();
        let cache = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(cache.config.sweep_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // the first tick completes immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = interval.tick() => {
                        cache.cleanup_expired().await;
                    }
                }
            }
        });

        SweeperHandle { token, handle }
    }

    /// Clear both tiers whenever the session token is cleared.
    ///
    /// Process-wide hook: one subscription per cache instance, not a
    /// per-request concern.
    pub fn bind_session_events(self: &Arc<Self>, store: &TokenStore) -> JoinHandle<()> {
        let mut events = store.subscribe();
        let cache = Arc::clone(self);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::SignedOut) => {
                        debug!("session ended, clearing request cache");
                        cache.clear().await;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

/// Stops the background sweep when the owning client shuts down
#[derive(Debug)]
pub struct SweeperHandle {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the sweeper to stop
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Signal the sweeper and wait for it to exit
    pub async fn stopped(self) {
        self.token.cancel();
        let _ = self.handle.await;
    }
}
