//! The stock ledger: service of record for quantity on hand.
//!
//! Quantity accounting and any locking around it belong to the ledger
//! implementation. Callers only shape and route requests to it.

use std::sync::Arc;

use thiserror::Error;

use stockdesk_core::{LocationId, OrderId, TransactionId, UserId, VariationId};

/// A movement the ledger refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("unknown stock location {0}")]
    UnknownLocation(LocationId),

    #[error("insufficient stock (available: {available}, requested: {requested})")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("{0}")]
    Rejected(String),
}

/// Stock-changing operations. Each call is one independent ledger
/// transaction; there is no batch atomicity.
///
/// `unit_cost` is in the smallest currency unit.
#[allow(clippy::too_many_arguments)]
pub trait StockLedger: Send + Sync {
    fn receive_stock(
        &self,
        variation: VariationId,
        location: LocationId,
        zone: &str,
        quantity: i64,
        unit_cost: Option<u64>,
        note: Option<&str>,
    ) -> Result<TransactionId, LedgerError>;

    fn sell_stock(
        &self,
        variation: VariationId,
        location: LocationId,
        zone: &str,
        quantity: i64,
        unit_cost: Option<u64>,
        order: Option<OrderId>,
        user: Option<UserId>,
        note: Option<&str>,
    ) -> Result<TransactionId, LedgerError>;

    fn return_stock(
        &self,
        variation: VariationId,
        location: LocationId,
        zone: &str,
        quantity: i64,
        unit_cost: Option<u64>,
        order: Option<OrderId>,
        user: Option<UserId>,
        note: Option<&str>,
    ) -> Result<TransactionId, LedgerError>;

    fn move_stock(
        &self,
        variation: VariationId,
        source: LocationId,
        target: LocationId,
        source_zone: &str,
        target_zone: &str,
        quantity: i64,
        unit_cost: Option<u64>,
        note: Option<&str>,
    ) -> Result<TransactionId, LedgerError>;

    /// Quantity on hand. `zone = None` sums every zone of the location.
    fn stock_level(&self, variation: VariationId, location: LocationId, zone: Option<&str>) -> i64;
}

#[allow(clippy::too_many_arguments)]
impl<S> StockLedger for Arc<S>
where
    S: StockLedger + ?Sized,
{
    fn receive_stock(
        &self,
        variation: VariationId,
        location: LocationId,
        zone: &str,
        quantity: i64,
        unit_cost: Option<u64>,
        note: Option<&str>,
    ) -> Result<TransactionId, LedgerError> {
        (**self).receive_stock(variation, location, zone, quantity, unit_cost, note)
    }

    fn sell_stock(
        &self,
        variation: VariationId,
        location: LocationId,
        zone: &str,
        quantity: i64,
        unit_cost: Option<u64>,
        order: Option<OrderId>,
        user: Option<UserId>,
        note: Option<&str>,
    ) -> Result<TransactionId, LedgerError> {
        (**self).sell_stock(variation, location, zone, quantity, unit_cost, order, user, note)
    }

    fn return_stock(
        &self,
        variation: VariationId,
        location: LocationId,
        zone: &str,
        quantity: i64,
        unit_cost: Option<u64>,
        order: Option<OrderId>,
        user: Option<UserId>,
        note: Option<&str>,
    ) -> Result<TransactionId, LedgerError> {
        (**self).return_stock(variation, location, zone, quantity, unit_cost, order, user, note)
    }

    fn move_stock(
        &self,
        variation: VariationId,
        source: LocationId,
        target: LocationId,
        source_zone: &str,
        target_zone: &str,
        quantity: i64,
        unit_cost: Option<u64>,
        note: Option<&str>,
    ) -> Result<TransactionId, LedgerError> {
        (**self).move_stock(
            variation,
            source,
            target,
            source_zone,
            target_zone,
            quantity,
            unit_cost,
            note,
        )
    }

    fn stock_level(&self, variation: VariationId, location: LocationId, zone: Option<&str>) -> i64 {
        (**self).stock_level(variation, location, zone)
    }
}
