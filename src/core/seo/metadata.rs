// src/core/seo/metadata.rs

//! Turns the SEO service's JSON response into a `MetadataRecord`.
//!
//! The response is decoded into a loosely typed `UpstreamDocument` first; each part is
//! then validated on its own so that one malformed tag or field never discards the rest.

use crate::core::StylaError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Tags that end up in `MetadataRecord::meta`.
const HEAD_TAGS: [&str; 3] = ["link", "meta", "noscript"];
/// `name` attributes promoted to top-level record fields instead of `meta` entries.
const PROMOTED_NAMES: [&str; 2] = ["description", "keywords"];
/// `name` attributes that are additionally indexed for direct lookup.
const INDEXED_NAMES: [&str; 2] = ["canonical", "author"];

/// One rendered tag as reported by the SEO service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDescriptor {
    pub tag: String,
    #[serde(default, deserialize_with = "lenient_attributes")]
    pub attributes: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl TagDescriptor {
    /// Returns the attribute `name` if it is present and a string.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }
}

/// Accepts any JSON value for `attributes`; anything but an object becomes empty.
fn lenient_attributes<'de, D>(deserializer: D) -> Result<IndexMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map.into_iter().collect(),
        _ => IndexMap::new(),
    })
}

/// The SEO metadata for one storefront page.
///
/// Built once per upstream fetch and cached as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// The `link`, `meta` and `noscript` tags to render into the page head, in order.
    #[serde(default)]
    pub meta: Vec<TagDescriptor>,
    /// Positions in `meta` of the tags named `canonical` and `author`.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub meta_index: IndexMap<String, usize>,
    /// Raw HTML for a `<noscript>` fallback. Not escaped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noscript_content: Option<String>,
    /// The status the renderer reports for the page, e.g. 404 for unknown magazine pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl MetadataRecord {
    /// Returns `true` if no field carries any metadata.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Looks up an indexed `meta` entry (`canonical` or `author`) by name.
    pub fn named_meta(&self, name: &str) -> Option<&TagDescriptor> {
        self.meta_index.get(name).and_then(|&i| self.meta.get(i))
    }
}

/// The response of the SEO service, before validation.
#[derive(Debug, Deserialize)]
struct UpstreamDocument {
    #[serde(default)]
    tags: Option<Value>,
    #[serde(default)]
    html: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
}

/// Parses `raw` into a record, failing only if `raw` is not a JSON object.
pub fn try_extract(raw: &str) -> Result<MetadataRecord, StylaError> {
    let document: UpstreamDocument = serde_json::from_str(raw)?;
    let mut record = MetadataRecord::default();

    let tags = match document.tags {
        Some(Value::Array(tags)) => tags,
        _ => Vec::new(),
    };
    for value in tags {
        // A tag that does not match the expected shape is skipped on its own.
        let Ok(tag) = serde_json::from_value::<TagDescriptor>(value) else {
            continue;
        };
        apply_tag(&mut record, tag);
    }

    record.noscript_content = document
        .html
        .as_ref()
        .and_then(|html| html.get("body"))
        .and_then(Value::as_str)
        .map(str::to_string);

    record.status = document.status.as_ref().and_then(parse_status);

    Ok(record)
}

/// Parses `raw` into a record. Never fails: anything unparseable yields an empty record.
pub fn extract(raw: &str) -> MetadataRecord {
    try_extract(raw).unwrap_or_default()
}

fn apply_tag(record: &mut MetadataRecord, tag: TagDescriptor) {
    if HEAD_TAGS.contains(&tag.tag.as_str()) {
        let name = tag.attribute("name").map(str::to_string);
        let content = tag.attribute("content").map(str::to_string);
        match name.as_deref() {
            Some(n) if PROMOTED_NAMES.contains(&n) => {
                if n == "description" {
                    record.description = content;
                } else {
                    record.keywords = content;
                }
            }
            Some(n) if INDEXED_NAMES.contains(&n) => {
                let value = content.or_else(|| tag.attribute("href").map(str::to_string));
                if n == "canonical" {
                    record.canonical = value;
                } else {
                    record.author = value;
                }
                record.meta_index.insert(n.to_string(), record.meta.len());
                record.meta.push(tag);
            }
            _ => record.meta.push(tag),
        }
    } else if tag.tag == "title" {
        record.page_title = tag.content;
    }
}

fn parse_status(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
