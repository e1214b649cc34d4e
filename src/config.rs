// src/config.rs

//! Manages the integration's configuration: loading, default resolution, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use tracing::warn;

/// Default Styla CDN serving the client scripts and stylesheets.
pub const DEFAULT_CDN_URL: &str = "http://cdn.styla.com";
/// Default Styla API serving the current asset version.
pub const DEFAULT_API_URL: &str = "http://live.styla.com";
/// Default SEO rendering service.
pub const DEFAULT_SEO_SERVER: &str = "http://seo.styla.com";
/// Default storefront path segment in front of the magazine routes.
pub const DEFAULT_MAGAZINE_BASEDIR: &str = "magazin";
/// Default storefront path segment in front of the product feed routes.
pub const DEFAULT_FEED_BASEDIR: &str = "stylafeed";

/// Returns `value` unless it is unset or blank, in which case `default` is used.
fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

/// Settings for the Styla services and the storefront paths they are mounted under.
///
/// Every URL and directory is optional; an unset or empty value resolves to the
/// matching built-in default through the accessor methods.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct StylaConfig {
    /// Base URL of the SEO rendering service.
    #[serde(default)]
    pub seo_server: Option<String>,
    /// The storefront path segment stripped from request paths before querying the SEO service.
    #[serde(default)]
    pub seo_basedir: Option<String>,
    /// Base URL of the version API.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Base URL of the CDN hosting client scripts and stylesheets.
    #[serde(default)]
    pub cdn_url: Option<String>,
    /// The storefront path segment for product feed routes.
    #[serde(default)]
    pub feed_basedir: Option<String>,
    /// If true, the product feed routes are registered alongside the magazine routes.
    #[serde(default)]
    pub api_active: bool,
}

impl StylaConfig {
    pub fn seo_server_url(&self) -> &str {
        or_default(&self.seo_server, DEFAULT_SEO_SERVER)
    }

    pub fn seo_basedir(&self) -> &str {
        or_default(&self.seo_basedir, DEFAULT_MAGAZINE_BASEDIR)
    }

    pub fn api_url(&self) -> &str {
        or_default(&self.api_url, DEFAULT_API_URL)
    }

    pub fn cdn_url(&self) -> &str {
        or_default(&self.cdn_url, DEFAULT_CDN_URL)
    }

    pub fn feed_basedir(&self) -> &str {
        or_default(&self.feed_basedir, DEFAULT_FEED_BASEDIR)
    }
}

/// Configuration for the cache shared by all Styla lookups.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CacheConfig {
    /// The directory holding one file per cache entry.
    #[serde(default = "default_cache_dir")]
    pub dir: String,
    /// How long fetched SEO metadata stays fresh, in seconds.
    #[serde(default = "default_seo_ttl")]
    pub seo_ttl_seconds: u64,
    /// How long product feed responses stay fresh, in seconds. Read by the host's feed
    /// controller; no lookup in this crate uses it.
    #[serde(default = "default_feed_ttl")]
    pub feed_ttl_seconds: u64,
    /// How often the background sweeper runs, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Entries older than this are deleted by the sweeper, in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
}

fn default_cache_dir() -> String {
    "styla_cache".to_string()
}
fn default_seo_ttl() -> u64 {
    3600 // 1 hour
}
fn default_feed_ttl() -> u64 {
    3600 // 1 hour
}
fn default_sweep_interval() -> u64 {
    3600 // 1 hour
}
fn default_max_age() -> u64 {
    86400 // 1 day
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            seo_ttl_seconds: default_seo_ttl(),
            feed_ttl_seconds: default_feed_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
            max_age_seconds: default_max_age(),
        }
    }
}

impl CacheConfig {
    pub fn seo_ttl(&self) -> Duration {
        Duration::from_secs(self.seo_ttl_seconds)
    }
}

/// Transport settings for requests to the Styla services.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Sent as the `User-Agent` so Styla can identify the caller.
    #[serde(default = "default_client_header")]
    pub client_header: String,
    /// The maximum number of redirects followed per request.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_timeout() -> u64 {
    60
}
fn default_client_header() -> String {
    "OXID Styla SEO Module".to_string()
}
fn default_max_redirects() -> usize {
    10
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            client_header: default_client_header(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// A storefront language.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub id: u32,
    /// The URL prefix used for this language, e.g. `en`.
    pub abbr: String,
}

/// The shop context the integration runs in.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ShopConfig {
    #[serde(default = "default_shop_id")]
    pub shop_id: String,
    /// The language of the current request.
    #[serde(default)]
    pub language_id: u32,
    /// The currency index of the current request.
    #[serde(default)]
    pub currency: u32,
    /// The language whose URLs carry no language prefix.
    #[serde(default)]
    pub default_language: u32,
    #[serde(default = "default_languages")]
    pub languages: Vec<Language>,
}

fn default_shop_id() -> String {
    "1".to_string()
}
fn default_languages() -> Vec<Language> {
    vec![Language {
        id: 0,
        abbr: "de".to_string(),
    }]
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            shop_id: default_shop_id(),
            language_id: 0,
            currency: 0,
            default_language: 0,
            languages: default_languages(),
        }
    }
}

/// Represents the final, validated configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub styla: StylaConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub shop: ShopConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            styla: StylaConfig::default(),
            cache: CacheConfig::default(),
            fetch: FetchConfig::default(),
            shop: ShopConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml_str(&contents).with_context(|| format!("Invalid config in '{path}'"))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration to ensure logical consistency.
    fn validate(&self) -> Result<()> {
        if self.fetch.timeout_seconds == 0 {
            return Err(anyhow!("fetch.timeout_seconds cannot be 0"));
        }
        if self.fetch.client_header.trim().is_empty() {
            return Err(anyhow!("fetch.client_header cannot be empty"));
        }
        if self.cache.dir.trim().is_empty() {
            return Err(anyhow!("cache.dir cannot be empty"));
        }
        if self.cache.sweep_interval_seconds == 0 {
            return Err(anyhow!("cache.sweep_interval_seconds cannot be 0"));
        }
        if self.shop.shop_id.trim().is_empty() {
            return Err(anyhow!("shop.shop_id cannot be empty"));
        }
        if self.shop.languages.is_empty() {
            return Err(anyhow!("shop.languages must list at least one language"));
        }
        if !self
            .shop
            .languages
            .iter()
            .any(|l| l.id == self.shop.default_language)
        {
            return Err(anyhow!(
                "shop.default_language {} is not one of shop.languages",
                self.shop.default_language
            ));
        }

        if self.cache.seo_ttl_seconds == 0 {
            warn!("cache.seo_ttl_seconds is 0: SEO metadata will be fetched on every request.");
        }
        if self.cache.max_age_seconds < self.cache.seo_ttl_seconds {
            warn!(
                "cache.max_age_seconds ({}) is shorter than cache.seo_ttl_seconds ({}); fresh entries may be swept.",
                self.cache.max_age_seconds, self.cache.seo_ttl_seconds
            );
        }
        Ok(())
    }
}
