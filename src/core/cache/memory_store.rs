// src/core/cache/memory_store.rs

use super::{CacheEntry, CacheStore};
use crate::core::StylaError;
use async_trait::async_trait;
use dashmap::DashMap;

/// A process-local cache store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StylaError> {
        Ok(self.entries.get(key).map(|e| e.value().clone()))
    }

    async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), StylaError> {
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StylaError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn purge_older_than(&self, cutoff: i64) -> Result<usize, StylaError> {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = entry.timestamp >= cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}
