// src/core/errors.rs

//! Defines the primary error type for the Styla integration.

use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all failures that can occur while talking to the
/// Styla services or the cache.
///
/// None of these are fatal to the host: the page-facing operations log them and
/// degrade to "no enrichment".
#[derive(Error, Debug, Clone)]
pub enum StylaError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("HTTP client error: {0}")]
    HttpClientError(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Upstream returned an empty body for '{0}'")]
    EmptyBody(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal Error: {0}")]
    Internal(String),
}

impl PartialEq for StylaError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StylaError::Io(e1), StylaError::Io(e2)) => e1.kind() == e2.kind(),
            (StylaError::HttpClientError(s1), StylaError::HttpClientError(s2)) => s1 == s2,
            (StylaError::Timeout(s1), StylaError::Timeout(s2)) => s1 == s2,
            (StylaError::EmptyBody(s1), StylaError::EmptyBody(s2)) => s1 == s2,
            (StylaError::Json(s1), StylaError::Json(s2)) => s1 == s2,
            (StylaError::InvalidConfig(s1), StylaError::InvalidConfig(s2)) => s1 == s2,
            (StylaError::Internal(s1), StylaError::Internal(s2)) => s1 == s2,
            _ => false,
        }
    }
}

impl StylaError {
    /// Returns `true` for failures of the network transport (as opposed to cache or
    /// decoding problems).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            StylaError::HttpClientError(_) | StylaError::Timeout(_) | StylaError::EmptyBody(_)
        )
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for StylaError {
    fn from(e: std::io::Error) -> Self {
        StylaError::Io(Arc::new(e))
    }
}

impl From<reqwest::Error> for StylaError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            let url = e.url().map(|u| u.to_string()).unwrap_or_default();
            return StylaError::Timeout(url);
        }
        StylaError::HttpClientError(e.to_string())
    }
}

impl From<serde_json::Error> for StylaError {
    fn from(e: serde_json::Error) -> Self {
        StylaError::Json(e.to_string())
    }
}
