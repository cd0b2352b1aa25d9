//! Inventory control: stock movements entered as a batch of SKU rows.
//!
//! This crate contains the business rules only (no IO, no HTTP, no storage).
//! Storage and the stock ledger are collaborators reached through the traits
//! in [`catalog`], [`ledger`] and [`preferences`].

pub mod catalog;
pub mod dispatcher;
pub mod form;
pub mod ledger;
pub mod location_access;
pub mod preferences;
pub mod rows;
pub mod sku;
pub mod transaction;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{
    LocationDirectory, ProductVariation, StockLocation, VariationCatalog, VariationStatus,
};
pub use dispatcher::TransactionDispatcher;
pub use form::{FormView, StockControlForm};
pub use ledger::{LedgerError, StockLedger};
pub use location_access::{LocationAccess, LocationOptions, ensure_selectable, visible_locations};
pub use preferences::PreferenceStore;
pub use rows::{LineEntry, RowCollector, RowError};
pub use sku::{SUGGESTION_LIMIT, SkuResolver, UnknownSku};
pub use transaction::{DispatchOutcome, DispatchReport, OperationKind, TransactionRequest};
