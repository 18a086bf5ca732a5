//! Cache storage tiers

use super::types::{CacheEntry, CacheKey, StorageStatistics};
use crate::error::{AutosaazError, AutosaazResult};
use async_trait::async_trait;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Storage interface shared by both cache tiers
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Get a cache entry; expired entries are purged and reported as absent
    async fn get(&self, key: &CacheKey) -> AutosaazResult<Option<CacheEntry>>;

    /// Store a cache entry
    async fn set(&self, key: &CacheKey, entry: CacheEntry) -> AutosaazResult<()>;

    /// Remove a cache entry
    async fn remove(&self, key: &CacheKey) -> AutosaazResult<()>;

    /// Remove every entry whose canonical key contains `fragment`
    async fn remove_matching(&self, fragment: &str) -> AutosaazResult<usize>;

    /// Remove all entries
    async fn clear(&self) -> AutosaazResult<()>;

    /// Purge expired entries, returning how many were removed
    async fn cleanup_expired(&self) -> AutosaazResult<usize>;

    /// Storage statistics
    async fn statistics(&self) -> StorageStatistics;
}

/// In-memory tier backed by an LRU map
#[derive(Debug)]
pub struct MemoryStorage {
    cache: Arc<Mutex<LruCache<String, CacheEntry>>>,
    stats: Arc<Mutex<StorageStatistics>>,
}

impl MemoryStorage {
    /// Create a memory tier bounded to `capacity` entries
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
            stats: Arc::new(Mutex::new(StorageStatistics::default())),
        }
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn get(&self, key: &CacheKey) -> AutosaazResult<Option<CacheEntry>> {
        let mut cache = self.cache.lock().await;
        let mut stats = self.stats.lock().await;

        match cache.get(&key.canonical).cloned() {
            Some(entry) if entry.is_expired() => {
                cache.pop(&key.canonical);
                stats.evictions += 1;
                stats.misses += 1;
                stats.entry_count = cache.len();
                Ok(None)
            }
            Some(entry) => {
                stats.hits += 1;
                Ok(Some(entry))
            }
            None => {
                stats.misses += 1;
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &CacheKey, entry: CacheEntry) -> AutosaazResult<()> {
        let mut cache = self.cache.lock().await;
        let mut stats = self.stats.lock().await;

        let size = entry.size_bytes() as u64;
        let evicting = cache.len() >= cache.cap().get() && !cache.contains(&key.canonical);

        if let Some(old) = cache.put(key.canonical.clone(), entry) {
            stats.size_bytes = stats.size_bytes.saturating_sub(old.size_bytes() as u64);
        } else if evicting {
            stats.evictions += 1;
        }

        stats.size_bytes += size;
        stats.entry_count = cache.len();
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> AutosaazResult<()> {
        let mut cache = self.cache.lock().await;
        let mut stats = self.stats.lock().await;

        if let Some(entry) = cache.pop(&key.canonical) {
            stats.size_bytes = stats.size_bytes.saturating_sub(entry.size_bytes() as u64);
            stats.evictions += 1;
            stats.entry_count = cache.len();
        }
        Ok(())
    }

    async fn remove_matching(&self, fragment: &str) -> AutosaazResult<usize> {
        let mut cache = self.cache.lock().await;
        let mut stats = self.stats.lock().await;

        let matching: Vec<String> = cache
            .iter()
            .filter(|(k, _)| k.contains(fragment))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &matching {
            if let Some(entry) = cache.pop(key) {
                stats.size_bytes = stats.size_bytes.saturating_sub(entry.size_bytes() as u64);
                stats.evictions += 1;
            }
        }
        stats.entry_count = cache.len();
        Ok(matching.len())
    }

    async fn clear(&self) -> AutosaazResult<()> {
        let mut cache = self.cache.lock().await;
        let mut stats = self.stats.lock().await;

        cache.clear();
        *stats = StorageStatistics::default();
        Ok(())
    }

    async fn cleanup_expired(&self) -> AutosaazResult<usize> {
        let mut cache = self.cache.lock().await;
        let mut stats = self.stats.lock().await;

        let expired: Vec<String> = cache
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired {
            if let Some(entry) = cache.pop(key) {
                stats.size_bytes = stats.size_bytes.saturating_sub(entry.size_bytes() as u64);
                stats.evictions += 1;
            }
        }
        stats.entry_count = cache.len();
        Ok(expired.len())
    }

    async fn statistics(&self) -> StorageStatistics {
        self.stats.lock().await.clone()
    }
}

/// Persistent tier: one JSON file per entry under a cache directory.
///
/// Survives process restart. A byte capacity bounds growth; a write that
/// would exceed it fails with a cache error, which the manager treats as a
/// quota condition.
#[derive(Debug)]
pub struct DiskStorage {
    base_dir: PathBuf,
    capacity: u64,
    /// canonical key -> entry file, rebuilt from disk on initialize
    index: Arc<Mutex<HashMap<String, PathBuf>>>,
    current_size: Arc<Mutex<u64>>,
    stats: Arc<Mutex<StorageStatistics>>,
}

impl DiskStorage {
    /// Create a disk tier rooted at `base_dir`
    pub fn new(base_dir: impl AsRef<Path>, capacity: u64) -> AutosaazResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        if !base_dir.exists() {
            std::fs::create_dir_all(&base_dir).map_err(|e| {
                AutosaazError::cache(format!("Failed to create cache directory: {e}"))
            })?;
        }

        Ok(Self {
            base_dir,
            capacity,
            index: Arc::new(Mutex::new(HashMap::new())),
            current_size: Arc::new(Mutex::new(0)),
            stats: Arc::new(Mutex::new(StorageStatistics::default())),
        })
    }

    /// Rebuild the index from entries already on disk
    pub async fn initialize(&self) -> AutosaazResult<()> {
        let mut index = self.index.lock().await;
        let mut current_size = self.current_size.lock().await;
        let mut stats = self.stats.lock().await;

        index.clear();
        *current_size = 0;

        let mut dir = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| AutosaazError::cache(format!("Failed to read cache directory: {e}")))?;

        while let Some(file) = dir
            .next_entry()
            .await
            .map_err(|e| AutosaazError::cache(format!("Failed to read directory entry: {e}")))?
        {
            let path = file.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            // corrupt files are dropped rather than carried in the index
            let content = match fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(_) => continue,
            };
            match serde_json::from_str::<CacheEntry>(&content) {
                Ok(entry) => {
                    *current_size += content.len() as u64;
                    index.insert(entry.key, path);
                }
                Err(_) => {
                    let _ = fs::remove_file(&path).await;
                }
            }
        }

        stats.entry_count = index.len();
        stats.size_bytes = *current_size;
        Ok(())
    }

    fn file_path(&self, key: &CacheKey) -> PathBuf {
        self.base_dir.join(format!("{:016x}.json", key.digest()))
    }

    async fn remove_by_canonical(&self, canonical: &str) -> AutosaazResult<()> {
        let mut index = self.index.lock().await;
        let mut current_size = self.current_size.lock().await;
        let mut stats = self.stats.lock().await;

        if let Some(path) = index.remove(canonical) {
            if let Ok(metadata) = fs::metadata(&path).await {
                *current_size = current_size.saturating_sub(metadata.len());
            }
            let _ = fs::remove_file(&path).await;
            stats.evictions += 1;
            stats.entry_count = index.len();
            stats.size_bytes = *current_size;
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStorage for DiskStorage {
    async fn get(&self, key: &CacheKey) -> AutosaazResult<Option<CacheEntry>> {
        let path = {
            let index = self.index.lock().await;
            index.get(&key.canonical).cloned()
        };

        let Some(path) = path else {
            self.stats.lock().await.misses += 1;
            return Ok(None);
        };

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(_) => {
                self.stats.lock().await.misses += 1;
                return Ok(None);
            }
        };

        match serde_json::from_str::<CacheEntry>(&content) {
            Ok(entry) if entry.is_expired() => {
                self.remove_by_canonical(&key.canonical).await?;
                self.stats.lock().await.misses += 1;
                Ok(None)
            }
            Ok(entry) => {
                self.stats.lock().await.hits += 1;
                Ok(Some(entry))
            }
            Err(_) => {
                // corrupted entry
                self.remove_by_canonical(&key.canonical).await?;
                self.stats.lock().await.misses += 1;
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &CacheKey, entry: CacheEntry) -> AutosaazResult<()> {
        let content = serde_json::to_string(&entry)
            .map_err(|e| AutosaazError::cache(format!("Failed to serialize cache entry: {e}")))?;
        let new_size = content.len() as u64;

        let mut index = self.index.lock().await;
        let mut current_size = self.current_size.lock().await;
        let mut stats = self.stats.lock().await;

        let old_size = match index.get(&key.canonical) {
            Some(existing) => fs::metadata(existing).await.map(|m| m.len()).unwrap_or(0),
            None => 0,
        };

        if current_size.saturating_sub(old_size) + new_size > self.capacity {
            return Err(AutosaazError::cache("Persistent cache capacity exceeded"));
        }

        let path = self.file_path(key);
        fs::write(&path, &content)
            .await
            .map_err(|e| AutosaazError::cache(format!("Failed to write cache file: {e}")))?;

        index.insert(key.canonical.clone(), path);
        *current_size = current_size.saturating_sub(old_size) + new_size;
        stats.entry_count = index.len();
        stats.size_bytes = *current_size;
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> AutosaazResult<()> {
        self.remove_by_canonical(&key.canonical).await
    }

    async fn remove_matching(&self, fragment: &str) -> AutosaazResult<usize> {
        let matching: Vec<String> = {
            let index = self.index.lock().await;
            index
                .keys()
                .filter(|k| k.contains(fragment))
                .cloned()
                .collect()
        };

        for canonical in &matching {
            self.remove_by_canonical(canonical).await?;
        }
        Ok(matching.len())
    }

    async fn clear(&self) -> AutosaazResult<()> {
        let mut index = self.index.lock().await;
        let mut current_size = self.current_size.lock().await;
        let mut stats = self.stats.lock().await;

        for path in index.values() {
            let _ = fs::remove_file(path).await;
        }
        index.clear();
        *current_size = 0;
        *stats = StorageStatistics::default();
        Ok(())
    }

    async fn cleanup_expired(&self) -> AutosaazResult<usize> {
        let candidates: Vec<(String, PathBuf)> = {
            let index = self.index.lock().await;
            index.iter().map(|(k, p)| (k.clone(), p.clone())).collect()
        };

        let mut removed = 0;
        for (canonical, path) in candidates {
            let expired = match fs::read_to_string(&path).await {
                Ok(content) => serde_json::from_str::<CacheEntry>(&content)
                    .map(|entry| entry.is_expired())
                    .unwrap_or(true),
                Err(_) => true,
            };

            if expired {
                self.remove_by_canonical(&canonical).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn statistics(&self) -> StorageStatistics {
        self.stats.lock().await.clone()
    }
}
