//! Read-only records owned by the commerce storage, and the lookups the
//! stock form needs from it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use stockdesk_core::{LocationId, UserId, VariationId};

/// Publication status of a product variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VariationStatus {
    #[default]
    Enabled,
    Disabled,
}

/// A purchasable product variation, addressed by its SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariation {
    pub id: VariationId,
    pub sku: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: VariationStatus,
}

impl ProductVariation {
    pub fn is_active(&self) -> bool {
        self.status == VariationStatus::Enabled
    }
}

/// A place stock is kept. `managers` are the users who "own" it for
/// permission purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLocation {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub managers: Vec<UserId>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl StockLocation {
    pub fn is_managed_by(&self, user_id: UserId) -> bool {
        self.managers.contains(&user_id)
    }
}

/// Product variation lookups.
pub trait VariationCatalog: Send + Sync {
    /// Exact SKU match, regardless of status.
    fn find_variation_by_sku(&self, sku: &str) -> Option<ProductVariation>;

    /// SKUs containing `text` (case-insensitive), at most `limit` of them.
    fn search_skus(&self, text: &str, limit: usize) -> Vec<String>;
}

/// Stock location lookups.
pub trait LocationDirectory: Send + Sync {
    fn find_active_locations(&self) -> Vec<StockLocation>;
}

impl<S> VariationCatalog for Arc<S>
where
    S: VariationCatalog + ?Sized,
{
    fn find_variation_by_sku(&self, sku: &str) -> Option<ProductVariation> {
        (**self).find_variation_by_sku(sku)
    }

    fn search_skus(&self, text: &str, limit: usize) -> Vec<String> {
        (**self).search_skus(text, limit)
    }
}

impl<S> LocationDirectory for Arc<S>
where
    S: LocationDirectory + ?Sized,
{
    fn find_active_locations(&self) -> Vec<StockLocation> {
        (**self).find_active_locations()
    }
}
