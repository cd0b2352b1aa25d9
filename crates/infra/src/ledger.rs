//! In-memory stock ledger.
//!
//! Levels are kept per (variation, location, zone). Every accepted call
//! appends to the transaction log; a move appends a linked out/in pair.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use stockdesk_core::{LocationId, OrderId, TransactionId, UserId, VariationId};
use stockdesk_inventory::{LedgerError, LocationDirectory, StockLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Receive,
    Sell,
    Return,
    MoveOut,
    MoveIn,
}

/// One row of the ledger's transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerTransaction {
    pub id: TransactionId,
    pub kind: MovementKind,
    pub variation: VariationId,
    pub location: LocationId,
    pub zone: String,
    /// Signed change in quantity on hand.
    pub delta: i64,
    pub unit_cost: Option<u64>,
    pub order: Option<OrderId>,
    pub user: Option<UserId>,
    pub note: Option<String>,
    /// The other half of a move.
    pub related: Option<TransactionId>,
    pub occurred_at: DateTime<Utc>,
}

type LevelKey = (VariationId, LocationId, String);

#[derive(Debug, Default)]
struct LedgerState {
    levels: HashMap<LevelKey, i64>,
    transactions: Vec<LedgerTransaction>,
}

impl LedgerState {
    fn level(&self, variation: VariationId, location: LocationId, zone: &str) -> i64 {
        self.levels
            .get(&(variation, location, zone.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

/// Everything a single ledger entry needs besides kind and sign.
struct Entry<'a> {
    variation: VariationId,
    location: LocationId,
    zone: &'a str,
    delta: i64,
    unit_cost: Option<u64>,
    order: Option<OrderId>,
    user: Option<UserId>,
    note: Option<&'a str>,
}

pub struct InMemoryStockLedger {
    locations: Arc<dyn LocationDirectory>,
    allow_negative: bool,
    state: Mutex<LedgerState>,
}

impl InMemoryStockLedger {
    pub fn new(locations: Arc<dyn LocationDirectory>) -> Self {
        Self {
            locations,
            allow_negative: false,
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Let sells and moves drive quantity on hand below zero.
    pub fn allow_negative_stock(mut self, allow: bool) -> Self {
        self.allow_negative = allow;
        self
    }

    pub fn transactions(&self) -> Vec<LedgerTransaction> {
        match self.state.lock() {
            Ok(state) => state.transactions.clone(),
            Err(_) => vec![],
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerState>, LedgerError> {
        self.state
            .lock()
            .map_err(|_| LedgerError::Rejected("stock ledger unavailable".to_string()))
    }

    fn ensure_location(&self, location: LocationId) -> Result<(), LedgerError> {
        let known = self
            .locations
            .find_active_locations()
            .iter()
            .any(|l| l.id == location);
        if known { Ok(()) } else { Err(LedgerError::UnknownLocation(location)) }
    }

    fn ensure_positive(quantity: i64) -> Result<(), LedgerError> {
        if quantity > 0 {
            Ok(())
        } else {
            Err(LedgerError::Rejected(format!("quantity must be positive, got {quantity}")))
        }
    }

    fn ensure_available(
        &self,
        state: &LedgerState,
        variation: VariationId,
        location: LocationId,
        zone: &str,
        quantity: i64,
    ) -> Result<(), LedgerError> {
        let available = state.level(variation, location, zone);
        if self.allow_negative || available >= quantity {
            Ok(())
        } else {
            Err(LedgerError::InsufficientStock { available, requested: quantity })
        }
    }

    /// Level at `entry`'s key once its delta is applied; nothing is mutated.
    fn next_level(state: &LedgerState, entry: &Entry<'_>) -> Result<i64, LedgerError> {
        state
            .level(entry.variation, entry.location, entry.zone)
            .checked_add(entry.delta)
            .ok_or_else(|| LedgerError::Rejected("quantity out of range".to_string()))
    }

    fn record(
        state: &mut LedgerState,
        kind: MovementKind,
        entry: Entry<'_>,
        related: Option<TransactionId>,
    ) -> Result<TransactionId, LedgerError> {
        let level = Self::next_level(state, &entry)?;
        let id = TransactionId::new();
        state
            .levels
            .insert((entry.variation, entry.location, entry.zone.to_string()), level);

        state.transactions.push(LedgerTransaction {
            id,
            kind,
            variation: entry.variation,
            location: entry.location,
            zone: entry.zone.to_string(),
            delta: entry.delta,
            unit_cost: entry.unit_cost,
            order: entry.order,
            user: entry.user,
            note: entry.note.map(str::to_string),
            related,
            occurred_at: Utc::now(),
        });

        debug!(
            transaction = %id,
            ?kind,
            variation = %entry.variation,
            location = %entry.location,
            delta = entry.delta,
            "ledger entry"
        );
        Ok(id)
    }
}

impl StockLedger for InMemoryStockLedger {
    fn receive_stock(
        &self,
        variation: VariationId,
        location: LocationId,
        zone: &str,
        quantity: i64,
        unit_cost: Option<u64>,
        note: Option<&str>,
    ) -> Result<TransactionId, LedgerError> {
        Self::ensure_positive(quantity)?;
        self.ensure_location(location)?;

        let mut state = self.lock()?;
        let entry = Entry {
            variation,
            location,
            zone,
            delta: quantity,
            unit_cost,
            order: None,
            user: None,
            note,
        };
        Self::record(&mut state, MovementKind::Receive, entry, None)
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
        Self::ensure_positive(quantity)?;
        self.ensure_location(location)?;

        let mut state = self.lock()?;
        self.ensure_available(&state, variation, location, zone, quantity)?;
        let entry = Entry {
            variation,
            location,
            zone,
            delta: -quantity,
            unit_cost,
            order,
            user,
            note,
        };
        Self::record(&mut state, MovementKind::Sell, entry, None)
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
        Self::ensure_positive(quantity)?;
        self.ensure_location(location)?;

        let mut state = self.lock()?;
        let entry = Entry {
            variation,
            location,
            zone,
            delta: quantity,
            unit_cost,
            order,
            user,
            note,
        };
        Self::record(&mut state, MovementKind::Return, entry, None)
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
        Self::ensure_positive(quantity)?;
        self.ensure_location(source)?;
        self.ensure_location(target)?;

        let mut state = self.lock()?;
        self.ensure_available(&state, variation, source, source_zone, quantity)?;

        let out = Entry {
            variation,
            location: source,
            zone: source_zone,
            delta: -quantity,
            unit_cost,
            order: None,
            user: None,
            note,
        };
        let inbound = Entry {
            variation,
            location: target,
            zone: target_zone,
            delta: quantity,
            unit_cost,
            order: None,
            user: None,
            note,
        };

        // Both halves must fit before either is written. A move within one
        // zone nets to zero.
        Self::next_level(&state, &out)?;
        if (source, source_zone) != (target, target_zone) {
            Self::next_level(&state, &inbound)?;
        }

        let out_id = Self::record(&mut state, MovementKind::MoveOut, out, None)?;
        Self::record(&mut state, MovementKind::MoveIn, inbound, Some(out_id))?;

        Ok(out_id)
    }

    fn stock_level(&self, variation: VariationId, location: LocationId, zone: Option<&str>) -> i64 {
        let Ok(state) = self.state.lock() else {
            return 0;
        };
        match zone {
            Some(zone) => state.level(variation, location, zone),
            None => state
                .levels
                .iter()
                .filter(|((v, l, _), _)| *v == variation && *l == location)
                .fold(0i64, |total, (_, qty)| total.saturating_add(*qty)),
        }
    }
}
