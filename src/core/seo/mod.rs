// src/core/seo/mod.rs

//! SEO metadata for magazine pages, pre-rendered by the Styla SEO service.

pub mod metadata;
mod service;

pub use metadata::{MetadataRecord, TagDescriptor, extract, try_extract};
pub use service::{FetchStatsSnapshot, RemoteContentService, SEO_CACHE_PREFIX, strip_base_dir};
