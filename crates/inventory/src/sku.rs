//! SKU resolution and autocomplete.

use thiserror::Error;
use tracing::debug;

use stockdesk_core::VariationId;

use crate::VariationCatalog;

/// Hard cap on autocomplete suggestions.
pub const SUGGESTION_LIMIT: usize = 20;

/// No active variation carries the SKU.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("SKU: {0} doesn't exist.")]
pub struct UnknownSku(pub String);

/// Maps scanned or typed SKUs to product variations.
pub struct SkuResolver<'a, C: ?Sized> {
    catalog: &'a C,
}

impl<'a, C> SkuResolver<'a, C>
where
    C: VariationCatalog + ?Sized,
{
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Exact match among enabled variations.
    ///
    /// Scanners often append whitespace, so the input is trimmed first.
    pub fn resolve(&self, sku: &str) -> Result<VariationId, UnknownSku> {
        let sku = sku.trim();
        if sku.is_empty() {
            return Err(UnknownSku(String::new()));
        }

        match self.catalog.find_variation_by_sku(sku) {
            Some(variation) if variation.is_active() => Ok(variation.id),
            _ => Err(UnknownSku(sku.to_string())),
        }
    }

    /// Case-insensitive substring suggestions for the SKU field.
    ///
    /// `limit` is clamped to [`SUGGESTION_LIMIT`]. An empty query suggests
    /// nothing.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let limit = limit.min(SUGGESTION_LIMIT);
        let mut skus = self.catalog.search_skus(query, limit);
        skus.truncate(limit);
        debug!(query, matches = skus.len(), "sku autocomplete");
        skus
    }
}
