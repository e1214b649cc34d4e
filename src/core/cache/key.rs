// src/core/cache/key.rs

use crate::config::ShopConfig;
use std::fmt;

/// The shop context a scoped cache key belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopScope {
    pub shop_id: String,
    pub language_id: u32,
    pub currency: u32,
}

impl ShopScope {
    pub fn new(shop_id: impl Into<String>, language_id: u32, currency: u32) -> Self {
        Self {
            shop_id: shop_id.into(),
            language_id,
            currency,
        }
    }
}

impl From<&ShopConfig> for ShopScope {
    fn from(shop: &ShopConfig) -> Self {
        Self::new(shop.shop_id.clone(), shop.language_id, shop.currency)
    }
}

/// A filesystem-safe cache key.
///
/// Path separators and colons never survive construction, so a key can be used
/// directly as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Replaces every path separator and colon in `raw` with `-`.
    pub fn normalize(raw: &str) -> String {
        raw.chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '-',
                other => other,
            })
            .collect()
    }

    /// Builds a key for `name` that is distinct per shop, language and currency.
    pub fn scoped(name: &str, scope: &ShopScope) -> Self {
        Self(Self::normalize(&format!(
            "{name}_{}_{}_{}",
            scope.shop_id, scope.language_id, scope.currency
        )))
    }

    /// Builds a key for `name` shared by all shops.
    pub fn global(name: &str) -> Self {
        Self(Self::normalize(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
