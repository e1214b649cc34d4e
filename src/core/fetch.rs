// src/core/fetch.rs

//! Performs the raw HTTP GETs against the Styla services.

use crate::config::FetchConfig;
use crate::core::{StylaError, metrics};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONNECTION, HeaderMap, HeaderValue};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Fetches the body behind a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the raw response body.
    ///
    /// The upstream status code is not interpreted: any body that arrives is returned.
    /// Transport errors and empty bodies are failures.
    async fn fetch(&self, url: &str) -> Result<String, StylaError>;
}

/// A `Fetcher` speaking HTTP through `reqwest`.
///
/// Every request uses a fresh connection that is closed afterwards, follows redirects,
/// and does not verify TLS certificates; the Styla services are reached through whatever
/// proxies or certificates the storefront host happens to have.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, StylaError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.client_header.clone())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| StylaError::InvalidConfig(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, StylaError> {
        debug!("Fetching '{}'", url);
        metrics::UPSTREAM_FETCHES_TOTAL.inc();
        let start = Instant::now();

        let result = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                debug!("'{}' responded with status {}", url, status);
            }
            Ok::<_, StylaError>(body)
        }
        .await;

        metrics::UPSTREAM_LATENCY_SECONDS.observe(start.elapsed().as_secs_f64());

        match result {
            Ok(body) if body.is_empty() => {
                metrics::UPSTREAM_FAILURES_TOTAL.inc();
                Err(StylaError::EmptyBody(url.to_string()))
            }
            Ok(body) => Ok(body),
            Err(e) => {
                warn!("Fetching '{}' failed: {}", url, e);
                metrics::UPSTREAM_FAILURES_TOTAL.inc();
                Err(e)
            }
        }
    }
}
