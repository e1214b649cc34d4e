// src/lib.rs

pub mod config;
pub mod core;

// Re-export
pub use crate::core::StylaState;
pub use crate::core::seo::{MetadataRecord, RemoteContentService};
pub use crate::core::version::VersionResolver;
