// src/core/cache/mod.rs

//! The cache capability used by every Styla lookup.
//!
//! Values are stored as a timestamped envelope (`CacheEntry`). Stores never judge
//! freshness themselves: the caller decides, per cache domain, how old an entry may be.
//! `TtlCache` layers that decision, key scoping and failure swallowing on top of any
//! `CacheStore`.

mod file_store;
mod key;
mod memory_store;
mod ttl_cache;

pub use file_store::FileCacheStore;
pub use key::{CacheKey, ShopScope};
pub use memory_store::MemoryCacheStore;
pub use ttl_cache::TtlCache;

use crate::config::CacheConfig;
use crate::core::StylaError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// The version lookup is always cached for one hour.
pub const VERSION_CACHE_TTL: Duration = Duration::from_secs(3600);

/// A cached value together with the unix time (seconds) at which it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: i64,
    pub content: serde_json::Value,
}

impl CacheEntry {
    pub fn new(timestamp: i64, content: serde_json::Value) -> Self {
        Self { timestamp, content }
    }

    /// Returns `true` if the entry is younger than `ttl` at time `now`.
    pub fn is_fresh(&self, now: i64, ttl: Duration) -> bool {
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        self.timestamp > now.saturating_sub(ttl)
    }
}

/// The logical cache domains, each with its own time-to-live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDomain {
    /// Pre-rendered SEO metadata.
    Seo,
    /// The client's current asset version.
    Version,
}

impl CacheDomain {
    /// Resolves the time-to-live for this domain.
    pub fn ttl(&self, config: &CacheConfig) -> Duration {
        match self {
            CacheDomain::Seo => config.seo_ttl(),
            CacheDomain::Version => VERSION_CACHE_TTL,
        }
    }

    /// The label used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheDomain::Seo => "seo",
            CacheDomain::Version => "version",
        }
    }
}

/// Trait for cache stores.
///
/// Keys are opaque, filesystem-safe strings (see `CacheKey`). Implementations must be safe
/// to use from several tasks, and, for shared backends, from several processes.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Retrieves the entry stored under `key`, regardless of its age.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StylaError>;

    /// Stores `entry` under `key`, replacing any previous entry.
    async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), StylaError>;

    /// Removes the entry stored under `key`, if any.
    async fn remove(&self, key: &str) -> Result<(), StylaError>;

    /// Removes every entry whose timestamp is older than `cutoff`.
    ///
    /// Returns the number of entries removed.
    async fn purge_older_than(&self, cutoff: i64) -> Result<usize, StylaError>;
}

/// A source of the current unix time in seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let secs = i64::try_from(by.as_secs()).unwrap_or(i64::MAX);
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
