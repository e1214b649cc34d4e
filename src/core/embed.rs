// src/core/embed.rs

//! Builds the `<script>` and `<link>` tags that load a Styla magazine into a page.

use crate::config::Config;
use crate::core::version::VersionResolver;
use url::form_urlencoded;

/// Renders the embed tags for a client's magazine script and stylesheet.
#[derive(Clone)]
pub struct EmbedSnippets {
    cdn_url: String,
    versions: VersionResolver,
}

impl EmbedSnippets {
    pub fn new(config: &Config, versions: VersionResolver) -> Self {
        Self {
            cdn_url: config.styla.cdn_url().to_string(),
            versions,
        }
    }

    /// Returns the `<script>` tag loading the client's magazine script.
    ///
    /// `js_url` overrides the configured CDN.
    pub async fn js_embed_code(&self, client_id: &str, js_url: Option<&str>) -> String {
        let src = self.asset_url(js_url, "scripts", client_id, "js").await;
        format!(r#"<script  type="text/javascript" src="{src}" async></script>"#)
    }

    /// Returns the `<link>` tag loading the client's magazine stylesheet.
    ///
    /// `css_url` overrides the configured CDN.
    pub async fn css_embed_code(&self, client_id: &str, css_url: Option<&str>) -> String {
        let href = self.asset_url(css_url, "styles", client_id, "css").await;
        format!(r#"<link rel="stylesheet" type="text/css" href="{href}">"#)
    }

    async fn asset_url(
        &self,
        base: Option<&str>,
        kind: &str,
        client_id: &str,
        extension: &str,
    ) -> String {
        let base = base.filter(|b| !b.trim().is_empty()).unwrap_or(&self.cdn_url);
        let version = self.versions.get_version(client_id).await;
        let version: String = form_urlencoded::byte_serialize(version.as_bytes()).collect();
        format!(
            "{}{kind}/clients/{client_id}.{extension}?version={version}",
            protocol_relative(base)
        )
    }
}

/// Strips an `http:`/`https:` scheme from `base` and ensures a single trailing slash.
pub fn protocol_relative(base: &str) -> String {
    let base = format!("{}/", base.trim().trim_end_matches('/'));
    let lower = base.to_ascii_lowercase();
    for scheme in ["http:", "https:"] {
        if lower.starts_with(scheme) {
            return base[scheme.len()..].to_string();
        }
    }
    base
}
