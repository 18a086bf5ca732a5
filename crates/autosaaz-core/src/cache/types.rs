//! Cache types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::Duration;

/// Prefix shared by every cache key
const KEY_PREFIX: &str = "autosaaz";

/// Cache key derived from an endpoint and its query parameters.
///
/// Parameters are sorted lexicographically before serialization, so two
/// parameter maps that are equal as sets produce the same key regardless of
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Endpoint the entry belongs to (e.g. "get-garages")
    pub endpoint: String,
    /// Canonical text: `autosaaz:<endpoint>?k1=v1&k2=v2`
    pub canonical: String,
}

impl CacheKey {
    /// Create a cache key from an endpoint and query parameters
    pub fn new<I, K, V>(endpoint: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let endpoint = endpoint.into();

        // BTreeMap gives the lexicographic ordering the canonical form needs
        let sorted: BTreeMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();

        let query = sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let canonical = if query.is_empty() {
            format!("{KEY_PREFIX}:{endpoint}")
        } else {
            format!("{KEY_PREFIX}:{endpoint}?{query}")
        };

        Self {
            endpoint,
            canonical,
        }
    }

    /// Key for an endpoint without parameters
    pub fn bare(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, std::iter::empty::<(String, String)>())
    }

    /// Filesystem-safe digest used to name the persistent-tier file
    pub fn digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.canonical.hash(&mut hasher);
        hasher.finish()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Cache entry containing the decoded response body and its expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Canonical key text, kept for pattern invalidation
    pub key: String,
    /// Cached payload
    pub data: serde_json::Value,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
    /// When the entry expires; frozen at creation, never recomputed
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry expiring `ttl` from now
    pub fn new(key: &CacheKey, data: serde_json::Value, ttl: Duration) -> Self {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(3650));

        Self {
            key: key.canonical.clone(),
            data,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// An entry is valid iff now is before its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Approximate size of the serialized entry
    pub fn size_bytes(&self) -> usize {
        self.data.to_string().len() + self.key.len()
    }
}

/// Resource families served by the admin backend.
///
/// Every cacheable operation tags its requests with one of these; TTL and
/// storage tier are looked up from the tag instead of matching substrings of
/// endpoint names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Users,
    Garages,
    Orders,
    Payments,
    Disputes,
    SupportTickets,
    Notifications,
    Banners,
    CmsPages,
    Commission,
}

impl ResourceKind {
    /// Whether entries of this kind may be written to the persistent tier.
    ///
    /// Per-admin and fast-changing resources stay in memory only, so nothing
    /// session-scoped lingers in durable storage across restarts.
    pub fn is_persistent(&self) -> bool {
        !matches!(
            self,
            Self::Users | Self::Disputes | Self::Notifications | Self::SupportTickets
        )
    }

    /// Invalidation pattern covering the whole family
    pub fn family_pattern(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Garages => "garages",
            Self::Orders => "orders",
            Self::Payments => "payments",
            Self::Disputes => "disputes",
            Self::SupportTickets => "support-tickets",
            Self::Notifications => "notifications",
            Self::Banners => "banners",
            Self::CmsPages => "cms-pages",
            Self::Commission => "commission",
        }
    }
}

/// TTL table: one duration per resource kind, plus a fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtlTable {
    #[serde(with = "humantime_serde")]
    pub users: Duration,
    #[serde(with = "humantime_serde")]
    pub garages: Duration,
    #[serde(with = "humantime_serde")]
    pub orders: Duration,
    #[serde(with = "humantime_serde")]
    pub payments: Duration,
    #[serde(with = "humantime_serde")]
    pub disputes: Duration,
    #[serde(with = "humantime_serde")]
    pub support_tickets: Duration,
    #[serde(with = "humantime_serde")]
    pub notifications: Duration,
    #[serde(with = "humantime_serde")]
    pub banners: Duration,
    #[serde(with = "humantime_serde")]
    pub cms_pages: Duration,
    #[serde(with = "humantime_serde")]
    pub commission: Duration,
    /// Applied when a caller bypasses the table
    #[serde(with = "humantime_serde")]
    pub default: Duration,
}

impl Default for TtlTable {
    fn default() -> Self {
        Self {
            users: Duration::from_secs(120),
            garages: Duration::from_secs(300),
            orders: Duration::from_secs(60),
            payments: Duration::from_secs(120),
            disputes: Duration::from_secs(120),
            support_tickets: Duration::from_secs(120),
            notifications: Duration::from_secs(60),
            banners: Duration::from_secs(600),
            cms_pages: Duration::from_secs(600),
            commission: Duration::from_secs(600),
            default: Duration::from_secs(300),
        }
    }
}

impl TtlTable {
    /// Look up the TTL for a resource kind
    pub fn ttl_for(&self, kind: ResourceKind) -> Duration {
        match kind {
            ResourceKind::Users => self.users,
            ResourceKind::Garages => self.garages,
            ResourceKind::Orders => self.orders,
            ResourceKind::Payments => self.payments,
            ResourceKind::Disputes => self.disputes,
            ResourceKind::SupportTickets => self.support_tickets,
            ResourceKind::Notifications => self.notifications,
            ResourceKind::Banners => self.banners,
            ResourceKind::CmsPages => self.cms_pages,
            ResourceKind::Commission => self.commission,
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Memory tier capacity (number of entries)
    pub memory_capacity: usize,
    /// Enable the persistent tier
    pub enable_disk_cache: bool,
    /// Persistent tier directory; None resolves to the platform cache dir
    pub disk_cache_dir: Option<PathBuf>,
    /// Persistent tier capacity in bytes
    pub disk_capacity: u64,
    /// TTL per resource kind
    pub ttl: TtlTable,
    /// Period of the background expiry sweep
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_capacity: 500,
            enable_disk_cache: true,
            disk_cache_dir: None,
            disk_capacity: 20 * 1024 * 1024,
            ttl: TtlTable::default(),
            sweep_interval: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    /// Resolve the persistent tier directory, falling back to the platform
    /// cache dir
    pub fn resolve_disk_dir(&self) -> Option<PathBuf> {
        match &self.disk_cache_dir {
            Some(dir) => Some(dir.clone()),
            None => dirs::cache_dir().map(|d| d.join("autosaaz").join("requests")),
        }
    }
}

/// Per-tier counters, developer-facing only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageStatistics {
    /// Number of entries in storage
    pub entry_count: usize,
    /// Total size in bytes
    pub size_bytes: u64,
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
}

/// Combined statistics across both tiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatistics {
    /// Memory tier statistics
    pub memory_stats: StorageStatistics,
    /// Persistent tier statistics (if enabled)
    pub disk_stats: Option<StorageStatistics>,
}

impl CacheStatistics {
    /// Hit rate across both tiers
    pub fn hit_rate(&self) -> f64 {
        let disk = self.disk_stats.clone().unwrap_or_default();
        let hits = self.memory_stats.hits + disk.hits;
        let total = hits + self.memory_stats.misses + disk.misses;

        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_parameter_order() {
        let a = CacheKey::new("get-orders", [("status", "pending"), ("page", "2")]);
        let b = CacheKey::new("get-orders", [("page", "2"), ("status", "pending")]);

        assert_eq!(a, b);
        assert_eq!(a.canonical, "autosaaz:get-orders?page=2&status=pending");
    }

    #[test]
    fn test_key_without_params_has_no_query() {
        let key = CacheKey::bare("get-banners");
        assert_eq!(key.canonical, "autosaaz:get-banners");
    }

    #[test]
    fn test_digest_is_stable_for_equal_keys() {
        let a = CacheKey::new("get-users", [("role", "admin")]);
        let b = CacheKey::new("get-users", [("role", "admin")]);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn test_entry_expiry_is_frozen_at_creation() {
        let key = CacheKey::bare("get-garages");
        let entry = CacheEntry::new(&key, serde_json::json!({"ok": true}), Duration::from_secs(60));

        assert!(!entry.is_expired());
        assert_eq!(
            (entry.expires_at - entry.created_at).num_seconds(),
            60
        );
    }

    #[test]
    fn test_zero_ttl_entry_is_expired() {
        let key = CacheKey::bare("get-garages");
        let entry = CacheEntry::new(&key, serde_json::json!(null), Duration::ZERO);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_volatile_kinds_stay_out_of_disk_tier() {
        assert!(!ResourceKind::Users.is_persistent());
        assert!(!ResourceKind::Disputes.is_persistent());
        assert!(!ResourceKind::Notifications.is_persistent());
        assert!(!ResourceKind::SupportTickets.is_persistent());

        assert!(ResourceKind::Garages.is_persistent());
        assert!(ResourceKind::Banners.is_persistent());
    }

    #[test]
    fn test_ttl_table_lookup() {
        let table = TtlTable::default();
        assert_eq!(table.ttl_for(ResourceKind::Orders), Duration::from_secs(60));
        assert_eq!(
            table.ttl_for(ResourceKind::CmsPages),
            Duration::from_secs(600)
        );
    }
}
