// src/core/version.rs

//! Resolves the current asset version of a Styla client, used to bust browser caches
//! for the embedded script and stylesheet.

use crate::config::Config;
use crate::core::cache::{CacheDomain, CacheKey, TtlCache, VERSION_CACHE_TTL};
use crate::core::fetch::Fetcher;
use std::sync::Arc;
use tracing::{debug, warn};

/// Name of the version cache entry; the client id is appended.
pub const VERSION_CACHE_NAME: &str = "StylaVersionCache";

/// Looks up and caches client asset versions for one hour.
#[derive(Clone)]
pub struct VersionResolver {
    api_url: String,
    cache: TtlCache,
    fetcher: Arc<dyn Fetcher>,
}

impl VersionResolver {
    pub fn new(config: &Config, cache: TtlCache, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            api_url: config.styla.api_url().trim_end_matches('/').to_string(),
            cache,
            fetcher,
        }
    }

    /// The cache key holding the version of `client_id`.
    pub fn cache_key(client_id: &str) -> CacheKey {
        CacheKey::global(&format!("{VERSION_CACHE_NAME}_{client_id}"))
    }

    /// Returns the current version string of `client_id`, without surrounding whitespace.
    ///
    /// A failed lookup yields an empty string, which is cached like any other answer
    /// but never served from the cache: the next call asks the API again.
    pub async fn get_version(&self, client_id: &str) -> String {
        let key = Self::cache_key(client_id);
        if let Some(version) = self
            .cache
            .load::<String>(&key, CacheDomain::Version, VERSION_CACHE_TTL)
            .await
            .filter(|v| !v.is_empty())
        {
            return version;
        }

        let url = format!("{}/api/version/{}", self.api_url, client_id);
        let version = match self.fetcher.fetch(&url).await {
            Ok(body) => body.trim().to_string(),
            Err(e) => {
                warn!("Could not resolve version for client '{}': {}", client_id, e);
                String::new()
            }
        };
        debug!("Resolved version '{}' for client '{}'", version, client_id);

        self.cache.save(&key, &version).await;
        version
    }
}
