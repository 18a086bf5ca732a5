//! Request cache tests

use super::*;
use crate::auth::TokenStore;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn disk_config(dir: &TempDir) -> CacheConfig {
    CacheConfig {
        disk_cache_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    }
}

fn entry_files(dir: &TempDir) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir.path())
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_set_then_get_returns_payload_unchanged() {
    let cache = RequestCache::memory_only(CacheConfig::default());
    let key = CacheKey::new("get-orders", [("status", "pending")]);
    let payload = json!({"orders": [{"id": 1}, {"id": 2}]});

    cache.set(&key, ResourceKind::Orders, payload.clone()).await;

    assert_eq!(cache.get(&key).await, Some(payload));
}

#[tokio::test]
async fn test_get_after_ttl_elapsed_is_absent() {
    let mut config = CacheConfig::default();
    config.ttl.orders = Duration::from_millis(40);
    let cache = RequestCache::memory_only(config);
    let key = CacheKey::bare("get-orders");

    cache.set(&key, ResourceKind::Orders, json!({"ok": true})).await;
    assert!(cache.get(&key).await.is_some());

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(cache.get(&key).await.is_none());
}

#[tokio::test]
async fn test_volatile_kind_never_reaches_disk() {
    let dir = TempDir::new().unwrap();
    let cache = RequestCache::new(disk_config(&dir)).await.unwrap();
    let key = CacheKey::new("get-users", [("page", "1")]);

    cache.set(&key, ResourceKind::Users, json!({"users": []})).await;

    // retrievable through the cache, absent from durable storage
    assert!(cache.get(&key).await.is_some());
    assert!(entry_files(&dir).is_empty());

    // and gone after a restart
    let restarted = RequestCache::new(disk_config(&dir)).await.unwrap();
    assert!(restarted.get(&key).await.is_none());
}

#[tokio::test]
async fn test_persistent_kind_survives_restart() {
    let dir = TempDir::new().unwrap();
    let key = CacheKey::new("get-garages", [("city", "dubai")]);
    let payload = json!({"garages": [{"id": 7, "name": "Rapid Fix"}]});

    {
        let cache = RequestCache::new(disk_config(&dir)).await.unwrap();
        cache.set(&key, ResourceKind::Garages, payload.clone()).await;
        assert_eq!(entry_files(&dir).len(), 1);
    }

    let restarted = RequestCache::new(disk_config(&dir)).await.unwrap();
    assert_eq!(restarted.get(&key).await, Some(payload));
}

#[tokio::test]
async fn test_pattern_invalidation_spans_both_tiers() {
    let dir = TempDir::new().unwrap();
    let cache = RequestCache::new(disk_config(&dir)).await.unwrap();

    let list_key = CacheKey::bare("get-garages");
    let detail_key = CacheKey::new("get-garage-detail", [("id", "7")]);
    cache.set(&list_key, ResourceKind::Garages, json!({"garages": []})).await;
    cache.set(&detail_key, ResourceKind::Garages, json!({"id": 7})).await;

    cache.invalidate_pattern("garage").await;

    assert!(cache.get(&list_key).await.is_none());
    assert!(cache.get(&detail_key).await.is_none());
    assert!(entry_files(&dir).is_empty());
}

#[tokio::test]
async fn test_exact_invalidation_leaves_siblings() {
    let cache = RequestCache::memory_only(CacheConfig::default());
    let page_one = CacheKey::new("get-orders", [("page", "1")]);
    let page_two = CacheKey::new("get-orders", [("page", "2")]);

    cache.set(&page_one, ResourceKind::Orders, json!(1)).await;
    cache.set(&page_two, ResourceKind::Orders, json!(2)).await;

    cache.invalidate(&page_one).await;

    assert!(cache.get(&page_one).await.is_none());
    assert!(cache.get(&page_two).await.is_some());
}

#[tokio::test]
async fn test_quota_exceeded_degrades_to_memory_only() {
    let dir = TempDir::new().unwrap();
    let mut config = disk_config(&dir);
    // far below the size of any serialized entry
    config.disk_capacity = 16;
    let cache = RequestCache::new(config).await.unwrap();
    let key = CacheKey::bare("get-banners");

    // must not error or panic even though the persistent write is dropped
    cache.set(&key, ResourceKind::Banners, json!({"banners": [1, 2, 3]})).await;

    assert!(cache.get(&key).await.is_some());
    assert!(entry_files(&dir).is_empty());

    let restarted = RequestCache::new(disk_config(&dir)).await.unwrap();
    assert!(restarted.get(&key).await.is_none());
}

#[tokio::test]
async fn test_sign_out_clears_both_tiers() {
    let dir = TempDir::new().unwrap();
    let cache = Arc::new(RequestCache::new(disk_config(&dir)).await.unwrap());
    let store = TokenStore::new();
    let listener = cache.bind_session_events(&store);

    let users_key = CacheKey::bare("get-users");
    let garages_key = CacheKey::bare("get-garages");
    cache.set(&users_key, ResourceKind::Users, json!({"users": []})).await;
    cache.set(&garages_key, ResourceKind::Garages, json!({"garages": []})).await;

    store.clear();

    // the listener runs on its own task; give it a moment
    for _ in 0..100 {
        if cache.get(&garages_key).await.is_none() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert!(cache.get(&users_key).await.is_none());
    assert!(cache.get(&garages_key).await.is_none());
    assert!(entry_files(&dir).is_empty());

    listener.abort();
}

#[tokio::test]
async fn test_sweeper_purges_expired_entries() {
    let mut config = CacheConfig::default();
    config.ttl.orders = Duration::from_millis(20);
    config.sweep_interval = Duration::from_millis(50);
    let cache = Arc::new(RequestCache::memory_only(config));

    let key = CacheKey::bare("get-orders");
    cache.set(&key, ResourceKind::Orders, json!({"orders": []})).await;

    let sweeper = cache.start_sweeper();
    tokio::time::sleep(Duration::from_millis(150)).await;

    let stats = cache.statistics().await;
    assert_eq!(stats.memory_stats.entry_count, 0);

    sweeper.stopped().await;
}

#[tokio::test]
async fn test_disk_hit_promotes_to_memory() {
    let dir = TempDir::new().unwrap();
    let key = CacheKey::bare("get-cms-pages");

    {
        let cache = RequestCache::new(disk_config(&dir)).await.unwrap();
        cache.set(&key, ResourceKind::CmsPages, json!({"pages": []})).await;
    }

    let restarted = RequestCache::new(disk_config(&dir)).await.unwrap();
    assert!(restarted.get(&key).await.is_some());

    let stats = restarted.statistics().await;
    assert_eq!(stats.memory_stats.entry_count, 1);
}

#[tokio::test]
async fn test_statistics_track_hits_and_misses() {
    let cache = RequestCache::memory_only(CacheConfig::default());
    let key = CacheKey::bare("get-commission");

    assert!(cache.get(&key).await.is_none());
    cache.set(&key, ResourceKind::Commission, json!(5)).await;
    assert!(cache.get(&key).await.is_some());

    let stats = cache.statistics().await;
    assert_eq!(stats.memory_stats.hits, 1);
    assert_eq!(stats.memory_stats.misses, 1);
    assert!(stats.hit_rate() > 0.49 && stats.hit_rate() < 0.51);
}
