// src/core/routes.rs

//! Computes the SEO URL rows that make the magazine (and, optionally, the product feed)
//! reachable under friendly storefront paths.
//!
//! Only the plan is produced here. Writing the rows to the storefront's routing table,
//! and deleting the rows matched by `CLEANUP_PATTERNS` beforehand, is up to the host.

use crate::config::Config;
use md5::{Digest, Md5};
use serde::Serialize;
use uuid::Uuid;

/// A storefront controller URL and the path it is published under, relative to its base directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTemplate {
    pub standard_url: &'static str,
    pub seo_action: &'static str,
}

pub const MAGAZINE_ROUTES: [RouteTemplate; 2] = [
    RouteTemplate {
        standard_url: "index.php?cl=Styla_Magazine",
        seo_action: "",
    },
    RouteTemplate {
        standard_url: "index.php?cl=Styla_Magazine&fnc=getPluginVersion",
        seo_action: "version/",
    },
];

pub const FEED_ROUTES: [RouteTemplate; 3] = [
    RouteTemplate {
        standard_url: "index.php?cl=Styla_Feed&fnc=showAll",
        seo_action: "index/",
    },
    RouteTemplate {
        standard_url: "index.php?cl=Styla_Feed&fnc=showCategories",
        seo_action: "index/category/",
    },
    RouteTemplate {
        standard_url: "index.php?cl=Styla_Feed&fnc=showProduct",
        seo_action: "index/product/",
    },
];

/// `LIKE` patterns on the standard URL of rows left by this and earlier integrations.
pub const CLEANUP_PATTERNS: [&str; 4] = [
    "%Styla_%",
    "%StylaFeed_Output%",
    "%StylaSEO_Output%",
    "%Amazinefeed_Output%",
];

/// One row of the storefront routing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoRouteRow {
    pub object_id: String,
    /// Hex MD5 of the lowercased SEO URL.
    pub ident: String,
    pub shop_id: String,
    pub lang_id: u32,
    pub standard_url: String,
    pub seo_url: String,
    pub kind: &'static str,
    pub fixed: bool,
    pub expired: bool,
    pub params: String,
}

/// The rows to delete and insert when (re)installing the integration.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub shop_id: String,
    pub cleanup_patterns: Vec<&'static str>,
    pub rows: Vec<SeoRouteRow>,
}

/// Computes the route rows for every language of the configured shop.
///
/// Feed routes are only included when the product API is active.
pub fn plan_routes(config: &Config) -> RoutePlan {
    let mut rows = build_rows(config, config.styla.seo_basedir(), &MAGAZINE_ROUTES);
    if config.styla.api_active {
        rows.extend(build_rows(config, config.styla.feed_basedir(), &FEED_ROUTES));
    }
    RoutePlan {
        shop_id: config.shop.shop_id.clone(),
        cleanup_patterns: CLEANUP_PATTERNS.to_vec(),
        rows,
    }
}

fn build_rows(config: &Config, basedir: &str, templates: &[RouteTemplate]) -> Vec<SeoRouteRow> {
    let basedir = format!("{}/", basedir.trim_end_matches('/'));
    let mut rows = Vec::with_capacity(templates.len() * config.shop.languages.len());
    for template in templates {
        for language in &config.shop.languages {
            let prefix = if language.id == config.shop.default_language {
                String::new()
            } else {
                format!("{}/", language.abbr)
            };
            let seo_url = format!("{prefix}{basedir}{}", template.seo_action);
            rows.push(SeoRouteRow {
                object_id: Uuid::new_v4().simple().to_string(),
                ident: route_ident(&seo_url),
                shop_id: config.shop.shop_id.clone(),
                lang_id: language.id,
                standard_url: template.standard_url.to_string(),
                seo_url,
                kind: "static",
                fixed: false,
                expired: false,
                params: String::new(),
            });
        }
    }
    rows
}

/// The routing table's lookup hash for `seo_url`.
pub fn route_ident(seo_url: &str) -> String {
    hex::encode(Md5::digest(seo_url.to_lowercase().as_bytes()))
}
