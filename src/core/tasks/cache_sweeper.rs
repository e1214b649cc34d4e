// src/core/tasks/cache_sweeper.rs

use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::core::StylaError;
use crate::core::cache::TtlCache;

/// A task that periodically deletes cache entries nobody has refreshed for a long time.
///
/// Lookups never delete anything, so entries for pages that are no longer visited would
/// otherwise stay on disk forever.
pub struct CacheSweeperTask {
    cache: TtlCache,
    interval: Duration,
    max_age: Duration,
}

impl CacheSweeperTask {
    pub fn new(cache: TtlCache, interval: Duration, max_age: Duration) -> Self {
        Self {
            cache,
            interval,
            max_age,
        }
    }

    pub fn from_config(cache: TtlCache, config: &CacheConfig) -> Self {
        Self::new(
            cache,
            Duration::from_secs(config.sweep_interval_seconds),
            Duration::from_secs(config.max_age_seconds),
        )
    }

    /// The main run loop for the sweeper.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!("Cache sweeper task started.");
        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.sweep_once().await {
                        warn!("Cache sweep cycle failed: {}", e);
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Cache sweeper task shutting down.");
                    return;
                }
            }
        }
    }

    /// Runs a single sweep cycle, returning the number of entries removed.
    pub async fn sweep_once(&self) -> Result<usize, StylaError> {
        let removed = self.cache.purge_older_than(self.max_age).await?;
        if removed > 0 {
            info!("Cache sweep removed {} stale entries.", removed);
        } else {
            debug!("Cache sweep found no stale entries.");
        }
        Ok(removed)
    }
}
