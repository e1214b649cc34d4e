// src/core/seo/service.rs

//! Implements the remote content lookup: resolve the SEO service URL for the current
//! request, serve it from the cache when fresh, and otherwise fetch, extract and cache
//! it, with at most one upstream fetch in flight per cache key.

use super::metadata::{self, MetadataRecord};
use crate::config::Config;
use crate::core::cache::{CacheDomain, CacheKey, TtlCache};
use crate::core::fetch::Fetcher;
use crate::core::metrics;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use url::form_urlencoded;

/// Prefix of every SEO metadata cache key.
pub const SEO_CACHE_PREFIX: &str = "stylaseo_";

type SharedFetch = Shared<BoxFuture<'static, Option<MetadataRecord>>>;

/// Counters describing how lookups were served.
#[derive(Debug, Default)]
struct FetchStats {
    hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
    coalesced: AtomicU64,
}

/// A point-in-time copy of the service's lookup counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub failures: u64,
    pub coalesced: u64,
}

/// Serves SEO metadata for storefront pages embedding a Styla magazine.
pub struct RemoteContentService {
    seo_server: String,
    basedir: String,
    seo_ttl: Duration,
    cache: TtlCache,
    fetcher: Arc<dyn Fetcher>,
    /// Shared futures of the upstream fetches currently running, by cache key.
    in_flight: Arc<DashMap<String, SharedFetch>>,
    stats: Arc<FetchStats>,
}

impl RemoteContentService {
    pub fn new(config: &Config, cache: TtlCache, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            seo_server: config.styla.seo_server_url().to_string(),
            basedir: config.styla.seo_basedir().to_string(),
            seo_ttl: CacheDomain::Seo.ttl(&config.cache),
            cache,
            fetcher,
            in_flight: Arc::new(DashMap::new()),
            stats: Arc::new(FetchStats::default()),
        }
    }

    /// Builds the SEO service URL describing `request_path` for `client_id`.
    ///
    /// The client id goes into the path as given; only the stripped path is encoded.
    pub fn upstream_url(&self, client_id: &str, request_path: &str) -> String {
        let stripped = strip_base_dir(request_path, &self.basedir);
        let query: String = form_urlencoded::byte_serialize(stripped.as_bytes()).collect();
        format!(
            "{}/clients/{}?url={}",
            self.seo_server.trim_end_matches('/'),
            client_id,
            query
        )
    }

    /// The cache key under which the response for `upstream_url` is stored.
    pub fn cache_key(&self, upstream_url: &str) -> CacheKey {
        self.cache
            .scoped_key(&CacheKey::normalize(&format!("{SEO_CACHE_PREFIX}{upstream_url}")))
    }

    /// Returns the SEO metadata for the page at `request_path`.
    ///
    /// `None` means the metadata is unavailable right now (the SEO service could not be
    /// reached or sent nothing); the page should render without it. An empty record means
    /// the service answered but has no metadata for the page.
    pub async fn get_remote_content(
        &self,
        client_id: &str,
        request_path: &str,
    ) -> Option<MetadataRecord> {
        if client_id.trim().is_empty() {
            warn!("No Styla client id configured; skipping SEO content.");
            return None;
        }

        let url = self.upstream_url(client_id, request_path);
        let key = self.cache_key(&url);

        if let Some(record) = self
            .cache
            .load::<MetadataRecord>(&key, CacheDomain::Seo, self.seo_ttl)
            .await
        {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Some(record);
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);

        // --- Stampede Protection using a Shared Future ---
        let future_to_await = match self.in_flight.entry(key.to_string()) {
            // Follower path: a fetch for this key is already running.
            dashmap::mapref::entry::Entry::Occupied(occupied) => {
                debug!("SEO content for '{}' is being fetched already, awaiting it.", url);
                self.stats.coalesced.fetch_add(1, Ordering::Relaxed);
                metrics::COALESCED_FETCHES_TOTAL.inc();
                occupied.get().clone()
            }
            // Leader path: this caller fetches from the SEO service.
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                let fetch_future: BoxFuture<'static, Option<MetadataRecord>> = fetch_and_store(
                    self.fetcher.clone(),
                    self.cache.clone(),
                    self.stats.clone(),
                    url,
                    key.clone(),
                )
                .boxed();
                let shared_future = fetch_future.shared();
                vacant.insert(shared_future.clone());
                shared_future
            }
        };

        let result = future_to_await.clone().await;

        // The fetch is complete and its result cached; drop the shared future unless a
        // newer fetch for the same key has replaced it meanwhile.
        self.in_flight
            .remove_if(key.as_str(), |_, current| current.ptr_eq(&future_to_await));

        result
    }

    /// Returns the lookup counters.
    pub fn stats(&self) -> FetchStatsSnapshot {
        FetchStatsSnapshot {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            failures: self.stats.failures.load(Ordering::Relaxed),
            coalesced: self.stats.coalesced.load(Ordering::Relaxed),
        }
    }
}

/// Fetches `url`, extracts its metadata and caches it under `key`.
async fn fetch_and_store(
    fetcher: Arc<dyn Fetcher>,
    cache: TtlCache,
    stats: Arc<FetchStats>,
    url: String,
    key: CacheKey,
) -> Option<MetadataRecord> {
    let body = match fetcher.fetch(&url).await {
        Ok(body) => body,
        Err(e) => {
            stats.failures.fetch_add(1, Ordering::Relaxed);
            warn!("SEO content for '{}' is unavailable: {}", url, e);
            return None;
        }
    };

    match metadata::try_extract(&body) {
        Ok(record) => {
            cache.save(&key, &record).await;
            Some(record)
        }
        Err(e) => {
            warn!(
                "SEO response for '{}' is not a JSON document, rendering without metadata: {}",
                url, e
            );
            Some(MetadataRecord::default())
        }
    }
}

/// Returns the part of `request_path` behind the `basedir` segment, without its leading `/`.
///
/// `basedir` is matched as a whole path segment first and as a plain substring otherwise.
/// If it does not occur at all, the whole path is used.
pub fn strip_base_dir<'a>(request_path: &'a str, basedir: &str) -> &'a str {
    let basedir = basedir.trim_matches('/');
    let rest = match find_base_dir_end(request_path, basedir) {
        Some(end) => &request_path[end..],
        None => request_path,
    };
    rest.strip_prefix('/').unwrap_or(rest)
}

fn find_base_dir_end(path: &str, basedir: &str) -> Option<usize> {
    if basedir.is_empty() {
        return None;
    }
    let as_segment = path.match_indices(basedir).find(|(i, _)| {
        let after = &path[i + basedir.len()..];
        (*i == 0 || path[..*i].ends_with('/'))
            && (after.is_empty() || after.starts_with('/') || after.starts_with('?'))
    });
    as_segment
        .or_else(|| path.match_indices(basedir).next())
        .map(|(i, _)| i + basedir.len())
}
