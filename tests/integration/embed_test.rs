// tests/integration/embed_test.rs

//! Integration tests for the magazine embed tags.

use super::test_helpers::{MockFetcher, TestContext};
use styla_seo::config::Config;
use styla_seo::core::StylaError;

#[tokio::test]
async fn test_js_embed_code_uses_protocol_relative_cdn() {
    let ctx = TestContext::new(MockFetcher::new("42"));
    let tag = ctx.state.embed.js_embed_code("acme", None).await;
    assert_eq!(
        tag,
        r#"<script  type="text/javascript" src="//cdn.styla.com/scripts/clients/acme.js?version=42" async></script>"#
    );
}

#[tokio::test]
async fn test_css_embed_code_uses_protocol_relative_cdn() {
    let ctx = TestContext::new(MockFetcher::new("42"));
    let tag = ctx.state.embed.css_embed_code("acme", None).await;
    assert_eq!(
        tag,
        r#"<link rel="stylesheet" type="text/css" href="//cdn.styla.com/styles/clients/acme.css?version=42">"#
    );
}

#[tokio::test]
async fn test_embed_override_url_wins_over_config() {
    let mut config = Config::default();
    config.styla.cdn_url = Some("https://cdn.configured".to_string());
    let ctx = TestContext::with_config(config, MockFetcher::new("5"));

    let js = ctx
        .state
        .embed
        .js_embed_code("acme", Some("HTTPS://assets.example/"))
        .await;
    assert!(js.contains(r#"src="//assets.example/scripts/clients/acme.js?version=5""#));

    let css = ctx.state.embed.css_embed_code("acme", None).await;
    assert!(css.contains(r#"href="//cdn.configured/styles/clients/acme.css?version=5""#));
}

#[tokio::test]
async fn test_embed_tags_share_one_version_lookup() {
    let ctx = TestContext::new(MockFetcher::new("42"));
    ctx.state.embed.js_embed_code("acme", None).await;
    ctx.state.embed.css_embed_code("acme", None).await;
    assert_eq!(ctx.fetcher.call_count(), 1);
}

#[tokio::test]
async fn test_embed_version_is_url_encoded() {
    let ctx = TestContext::new(MockFetcher::new("1.2 beta&x"));
    let tag = ctx.state.embed.js_embed_code("acme", None).await;
    assert!(tag.contains("?version=1.2+beta%26x"));
}

#[tokio::test]
async fn test_embed_without_version_renders_empty_parameter() {
    let ctx = TestContext::new(MockFetcher::failing(StylaError::HttpClientError(
        "refused".into(),
    )));
    let tag = ctx.state.embed.css_embed_code("acme", None).await;
    assert!(tag.ends_with(r#"acme.css?version=">"#));
}

#[tokio::test]
async fn test_embed_version_drops_trailing_newline() {
    let ctx = TestContext::new(MockFetcher::new("42\n"));
    let tag = ctx.state.embed.js_embed_code("acme", None).await;
    assert!(tag.contains("acme.js?version=42\""));
}
