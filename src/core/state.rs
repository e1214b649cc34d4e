// src/core/state.rs

//! Defines `StylaState`, which wires the configured components together once per process.

use crate::config::Config;
use crate::core::StylaError;
use crate::core::cache::{CacheStore, Clock, FileCacheStore, ShopScope, SystemClock, TtlCache};
use crate::core::embed::EmbedSnippets;
use crate::core::fetch::{Fetcher, HttpFetcher};
use crate::core::routes::{self, RoutePlan};
use crate::core::seo::RemoteContentService;
use crate::core::tasks::cache_sweeper::CacheSweeperTask;
use crate::core::version::VersionResolver;
use std::sync::Arc;
use tracing::info;

/// The shared state of the integration: the configuration and every component built from it.
///
/// Wrap it in an `Arc` and hand it to the page-rendering layer.
pub struct StylaState {
    pub config: Config,
    pub cache: TtlCache,
    pub remote_content: RemoteContentService,
    pub versions: VersionResolver,
    pub embed: EmbedSnippets,
}

impl StylaState {
    /// Builds the production components: a file cache in `cache.dir`, the wall clock,
    /// and an HTTP fetcher.
    pub fn initialize(config: Config) -> Result<Self, StylaError> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        let store = FileCacheStore::new(&config.cache.dir);
        info!("Using cache directory '{}'", config.cache.dir);
        Ok(Self::with_parts(
            config,
            Arc::new(store),
            Arc::new(SystemClock),
            Arc::new(fetcher),
        ))
    }

    /// Builds the components around the given capabilities.
    pub fn with_parts(
        config: Config,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let cache = TtlCache::new(store, clock, ShopScope::from(&config.shop));
        let remote_content = RemoteContentService::new(&config, cache.clone(), fetcher.clone());
        let versions = VersionResolver::new(&config, cache.clone(), fetcher);
        let embed = EmbedSnippets::new(&config, versions.clone());
        Self {
            config,
            cache,
            remote_content,
            versions,
            embed,
        }
    }

    /// Creates the background sweeper for this state's cache.
    pub fn cache_sweeper(&self) -> CacheSweeperTask {
        CacheSweeperTask::from_config(self.cache.clone(), &self.config.cache)
    }

    /// Computes the SEO route rows for the configured shop.
    pub fn route_plan(&self) -> RoutePlan {
        routes::plan_routes(&self.config)
    }
}
