// src/core/mod.rs

//! The central module containing the Styla integration logic: caching, upstream
//! fetching, SEO metadata extraction and the helpers built on top of them.

pub mod cache;
pub mod embed;
pub mod errors;
pub mod fetch;
pub mod metrics;
pub mod routes;
pub mod seo;
pub mod state;
pub mod tasks;
pub mod version;

pub use errors::StylaError;
pub use state::StylaState;
