//! Initial data for the in-memory adapters, loaded from JSON.
//!
//! ```json
//! {
//!   "locations":  [{ "id": 1, "name": "Main", "managers": ["<user uuid>"] }],
//!   "variations": [{ "id": 10, "sku": "A100", "title": "Widget" }],
//!   "stock":      [{ "sku": "A100", "location": 1, "quantity": 25 }],
//!   "invoices":   [{ "id": 1, "customer": "ACME", "email": "ap@acme.test" }]
//! }
//! ```

use std::path::Path;

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use stockdesk_core::{InvoiceId, LocationId};
use stockdesk_inventory::{ProductVariation, StockLedger, StockLocation, VariationCatalog};
use stockdesk_invoicing::{Invoice, InvoiceRepository};

use crate::{InMemoryCatalog, InMemoryStockLedger};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid seed data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("seed stock references unknown SKU '{0}'")]
    UnknownSku(String),

    #[error("seed stock for '{sku}' rejected: {reason}")]
    Stock { sku: String, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Seed {
    #[serde(default)]
    pub locations: Vec<StockLocation>,
    #[serde(default)]
    pub variations: Vec<ProductVariation>,
    #[serde(default)]
    pub stock: Vec<StockSeed>,
    #[serde(default)]
    pub invoices: Vec<InvoiceSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockSeed {
    pub sku: String,
    pub location: LocationId,
    #[serde(default)]
    pub zone: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceSeed {
    pub id: InvoiceId,
    pub customer: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Seed {
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Load into the adapters. Locations and variations go first so opening
    /// stock can be received against them.
    pub fn apply(
        &self,
        catalog: &InMemoryCatalog,
        ledger: &InMemoryStockLedger,
        invoices: &dyn InvoiceRepository,
    ) -> Result<(), SeedError> {
        for location in &self.locations {
            catalog.upsert_location(location.clone());
        }
        for variation in &self.variations {
            catalog.upsert_variation(variation.clone());
        }

        for stock in &self.stock {
            let variation = catalog
                .find_variation_by_sku(&stock.sku)
                .ok_or_else(|| SeedError::UnknownSku(stock.sku.clone()))?;
            ledger
                .receive_stock(
                    variation.id,
                    stock.location,
                    &stock.zone,
                    stock.quantity,
                    None,
                    Some("opening stock"),
                )
                .map_err(|e| SeedError::Stock {
                    sku: stock.sku.clone(),
                    reason: e.to_string(),
                })?;
        }

        let now = Utc::now();
        for invoice in &self.invoices {
            invoices.put(Invoice::draft(
                invoice.id,
                invoice.customer.clone(),
                invoice.email.clone(),
                now,
            ));
        }

        info!(
            locations = self.locations.len(),
            variations = self.variations.len(),
            stock_entries = self.stock.len(),
            invoices = self.invoices.len(),
            "seed data loaded"
        );
        Ok(())
    }
}
