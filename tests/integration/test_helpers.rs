// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use styla_seo::StylaState;
use styla_seo::config::Config;
use styla_seo::core::StylaError;
use styla_seo::core::cache::{CacheEntry, CacheStore, ManualClock, MemoryCacheStore};
use styla_seo::core::fetch::Fetcher;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// The unix time every test clock starts at.
pub const T0: i64 = 1_700_000_000;

/// A `Fetcher` returning a scripted response and recording every URL it was asked for.
pub struct MockFetcher {
    response: Mutex<Result<String, StylaError>>,
    urls: Mutex<Vec<String>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl MockFetcher {
    pub fn new(body: &str) -> Self {
        Self {
            response: Mutex::new(Ok(body.to_string())),
            urls: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn failing(err: StylaError) -> Self {
        let fetcher = Self::new("");
        fetcher.fail_with(err);
        fetcher
    }

    /// Makes every fetch wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn respond_with(&self, body: &str) {
        *self.response.lock().unwrap() = Ok(body.to_string());
    }

    pub fn fail_with(&self, err: StylaError) {
        *self.response.lock().unwrap() = Err(err);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, StylaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response.lock().unwrap().clone()
    }
}

/// A cache store whose backend is permanently broken.
pub struct FailingStore;

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<CacheEntry>, StylaError> {
        Err(StylaError::Internal("cache unreadable".into()))
    }

    async fn put(&self, _key: &str, _entry: CacheEntry) -> Result<(), StylaError> {
        Err(StylaError::Internal("cache unwritable".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StylaError> {
        Err(StylaError::Internal("cache unwritable".into()))
    }

    async fn purge_older_than(&self, _cutoff: i64) -> Result<usize, StylaError> {
        Err(StylaError::Internal("cache unwritable".into()))
    }
}

/// TestContext wires a `StylaState` to an in-memory store, a manual clock and a mock fetcher.
pub struct TestContext {
    pub state: StylaState,
    pub store: Arc<MemoryCacheStore>,
    pub clock: Arc<ManualClock>,
    pub fetcher: Arc<MockFetcher>,
}

impl TestContext {
    /// Creates a new test context with default configuration
    pub fn new(fetcher: MockFetcher) -> Self {
        Self::with_config(Config::default(), fetcher)
    }

    /// Creates a new test context with custom configuration
    pub fn with_config(config: Config, fetcher: MockFetcher) -> Self {
        init_tracing();
        let store = Arc::new(MemoryCacheStore::new());
        let clock = Arc::new(ManualClock::new(T0));
        let fetcher = Arc::new(fetcher);
        let state = StylaState::with_parts(config, store.clone(), clock.clone(), fetcher.clone());
        Self {
            state,
            store,
            clock,
            fetcher,
        }
    }
}

/// Set up minimal tracing for tests (ignore error if already initialized)
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("warn"))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

pub const SEO_RESPONSE: &str = r#"{
    "tags": [
        {"tag": "title", "content": "Spring Looks"},
        {"tag": "meta", "attributes": {"name": "description", "content": "Fresh outfits"}},
        {"tag": "link", "attributes": {"rel": "canonical", "name": "canonical", "content": "https://shop.example/magazin/spring"}},
        {"tag": "meta", "attributes": {"property": "og:title", "content": "Spring Looks"}}
    ],
    "html": {"body": "<div>Spring</div>"},
    "status": 200
}"#;
