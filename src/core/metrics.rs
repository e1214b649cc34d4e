// src/core/metrics.rs

//! Defines and registers Prometheus metrics for the SEO fetch-and-cache path.
//!
//! This module uses `lazy_static` to ensure that metrics are registered only once
//! globally for the entire application lifecycle.

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Histogram, TextEncoder, register_counter, register_counter_vec,
    register_histogram,
};

lazy_static! {
    // --- Cache Counters ---
    /// The total number of fresh cache lookups, labeled by cache domain (`seo`, `version`).
    pub static ref CACHE_HITS_TOTAL: CounterVec =
        register_counter_vec!("styla_cache_hits_total", "Total number of cache hits, labeled by domain.", &["domain"]).unwrap();
    /// The total number of missed or expired cache lookups, labeled by cache domain.
    pub static ref CACHE_MISSES_TOTAL: CounterVec =
        register_counter_vec!("styla_cache_misses_total", "Total number of cache misses, labeled by domain.", &["domain"]).unwrap();
    /// The total number of cache writes that failed and were swallowed.
    pub static ref CACHE_WRITE_FAILURES_TOTAL: Counter =
        register_counter!("styla_cache_write_failures_total", "Total number of failed cache writes.").unwrap();


    // --- Upstream Counters ---
    /// The total number of requests sent to the Styla services.
    pub static ref UPSTREAM_FETCHES_TOTAL: Counter =
        register_counter!("styla_upstream_fetches_total", "Total number of upstream fetches.").unwrap();
    /// The total number of upstream requests that failed at the transport level.
    pub static ref UPSTREAM_FAILURES_TOTAL: Counter =
        register_counter!("styla_upstream_failures_total", "Total number of failed upstream fetches.").unwrap();
    /// The total number of callers that waited on another caller's in-flight fetch.
    pub static ref COALESCED_FETCHES_TOTAL: Counter =
        register_counter!("styla_coalesced_fetches_total", "Total number of requests served by a shared in-flight fetch.").unwrap();


    // --- Histograms ---
    /// A histogram of upstream fetch latencies.
    pub static ref UPSTREAM_LATENCY_SECONDS: Histogram =
        register_histogram!("styla_upstream_latency_seconds", "Latency of upstream fetches in seconds.").unwrap();
}

/// Gathers all registered metrics and encodes them in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode_to_string(&metric_families).unwrap_or_default()
}
