// src/core/cache/ttl_cache.rs

use super::{CacheDomain, CacheEntry, CacheKey, CacheStore, Clock, ShopScope};
use crate::core::{StylaError, metrics};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Freshness-checking, failure-swallowing access to a `CacheStore`.
///
/// A store that cannot be read behaves like an empty one, and a failed write is logged
/// and reported as `false`; neither ever reaches the caller as an error.
#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    scope: ShopScope,
}

impl TtlCache {
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>, scope: ShopScope) -> Self {
        Self {
            store,
            clock,
            scope,
        }
    }

    /// The shop scope used for `scoped_key`.
    pub fn scope(&self) -> &ShopScope {
        &self.scope
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Builds a key for `name` scoped to this cache's shop, language and currency.
    pub fn scoped_key(&self, name: &str) -> CacheKey {
        CacheKey::scoped(name, &self.scope)
    }

    /// Returns the content stored under `key` if it is younger than `ttl`.
    pub async fn load<T: DeserializeOwned>(
        &self,
        key: &CacheKey,
        domain: CacheDomain,
        ttl: Duration,
    ) -> Option<T> {
        let entry = match self.store.get(key.as_str()).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache read for '{}' failed, treating as miss: {}", key, e);
                None
            }
        };

        let content = entry
            .filter(|e| e.is_fresh(self.clock.now(), ttl))
            .and_then(|e| match serde_json::from_value::<T>(e.content) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(
                        "Cached content for '{}' is malformed, treating as miss: {}",
                        key, e
                    );
                    None
                }
            });

        let label = [domain.as_str()];
        if content.is_some() {
            debug!("Cache hit for '{}'", key);
            metrics::CACHE_HITS_TOTAL.with_label_values(&label).inc();
        } else {
            debug!("Cache miss for '{}'", key);
            metrics::CACHE_MISSES_TOTAL.with_label_values(&label).inc();
        }
        content
    }

    /// Stores `content` under `key`, stamped with the current time.
    ///
    /// Returns `false` if the value could not be written.
    pub async fn save<T: Serialize>(&self, key: &CacheKey, content: &T) -> bool {
        let value = match serde_json::to_value(content) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not serialize cache content for '{}': {}", key, e);
                metrics::CACHE_WRITE_FAILURES_TOTAL.inc();
                return false;
            }
        };
        let entry = CacheEntry::new(self.clock.now(), value);
        match self.store.put(key.as_str(), entry).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache write for '{}' failed: {}", key, e);
                metrics::CACHE_WRITE_FAILURES_TOTAL.inc();
                false
            }
        }
    }

    /// Deletes every entry older than `max_age`.
    pub async fn purge_older_than(&self, max_age: Duration) -> Result<usize, StylaError> {
        let max_age = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
        let cutoff = self.clock.now().saturating_sub(max_age);
        self.store.purge_older_than(cutoff).await
    }
}
