//! In-crate fakes for the collaborator traits.

use std::collections::HashMap;
use std::sync::Mutex;

use stockdesk_core::{LocationId, OrderId, TransactionId, UserId, VariationId};

use crate::{
    LedgerError, LocationDirectory, PreferenceStore, ProductVariation, StockLedger, StockLocation,
    VariationCatalog, VariationStatus,
};

#[derive(Default)]
pub struct FakeCatalog {
    variations: Vec<ProductVariation>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sku: &str, id: u64, status: VariationStatus) -> Self {
        self.variations.push(ProductVariation {
            id: VariationId::new(id),
            sku: sku.to_string(),
            title: format!("Variation {sku}"),
            status,
        });
        self
    }
}

impl VariationCatalog for FakeCatalog {
    fn find_variation_by_sku(&self, sku: &str) -> Option<ProductVariation> {
        self.variations.iter().find(|v| v.sku == sku).cloned()
    }

    fn search_skus(&self, text: &str, limit: usize) -> Vec<String> {
        let needle = text.to_lowercase();
        self.variations
            .iter()
            .filter(|v| v.sku.to_lowercase().contains(&needle))
            .take(limit)
            .map(|v| v.sku.clone())
            .collect()
    }
}

#[derive(Default)]
pub struct FakeLocations(pub Vec<StockLocation>);

impl LocationDirectory for FakeLocations {
    fn find_active_locations(&self) -> Vec<StockLocation> {
        self.0.iter().filter(|l| l.active).cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Receive {
        variation: VariationId,
        location: LocationId,
        zone: String,
        quantity: i64,
        note: Option<String>,
    },
    Sell {
        variation: VariationId,
        location: LocationId,
        quantity: i64,
        order: Option<OrderId>,
        user: Option<UserId>,
    },
    Return {
        variation: VariationId,
        location: LocationId,
        quantity: i64,
        order: Option<OrderId>,
        user: Option<UserId>,
    },
    Move {
        variation: VariationId,
        source: LocationId,
        target: LocationId,
        quantity: i64,
    },
}

/// Records every call; optionally fails for chosen variations.
#[derive(Default)]
pub struct FakeLedger {
    calls: Mutex<Vec<LedgerCall>>,
    failures: HashMap<VariationId, LedgerError>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, variation: VariationId, error: LedgerError) -> Self {
        self.failures.insert(variation, error);
        self
    }

    pub fn calls(&self) -> Vec<LedgerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, variation: VariationId, call: LedgerCall) -> Result<TransactionId, LedgerError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.get(&variation) {
            Some(err) => Err(err.clone()),
            None => Ok(TransactionId::new()),
        }
    }
}

impl StockLedger for FakeLedger {
    fn receive_stock(
        &self,
        variation: VariationId,
        location: LocationId,
        zone: &str,
        quantity: i64,
        _unit_cost: Option<u64>,
        note: Option<&str>,
    ) -> Result<TransactionId, LedgerError> {
        self.record(
            variation,
            LedgerCall::Receive {
                variation,
                location,
                zone: zone.to_string(),
                quantity,
                note: note.map(str::to_string),
            },
        )
    }

    fn sell_stock(
        &self,
        variation: VariationId,
        location: LocationId,
        _zone: &str,
        quantity: i64,
        _unit_cost: Option<u64>,
        order: Option<OrderId>,
        user: Option<UserId>,
        _note: Option<&str>,
    ) -> Result<TransactionId, LedgerError> {
        self.record(
            variation,
            LedgerCall::Sell { variation, location, quantity, order, user },
        )
    }

    fn return_stock(
        &self,
        variation: VariationId,
        location: LocationId,
        _zone: &str,
        quantity: i64,
        _unit_cost: Option<u64>,
        order: Option<OrderId>,
        user: Option<UserId>,
        _note: Option<&str>,
    ) -> Result<TransactionId, LedgerError> {
        self.record(
            variation,
            LedgerCall::Return { variation, location, quantity, order, user },
        )
    }

    fn move_stock(
        &self,
        variation: VariationId,
        source: LocationId,
        target: LocationId,
        _source_zone: &str,
        _target_zone: &str,
        quantity: i64,
        _unit_cost: Option<u64>,
        _note: Option<&str>,
    ) -> Result<TransactionId, LedgerError> {
        self.record(
            variation,
            LedgerCall::Move { variation, source, target, quantity },
        )
    }

    fn stock_level(&self, _variation: VariationId, _location: LocationId, _zone: Option<&str>) -> i64 {
        0
    }
}

#[derive(Default)]
pub struct FakePreferences {
    defaults: Mutex<HashMap<UserId, LocationId>>,
}

impl PreferenceStore for FakePreferences {
    fn default_location(&self, user: UserId) -> Option<LocationId> {
        self.defaults.lock().unwrap().get(&user).copied()
    }

    fn set_default_location(&self, user: UserId, location: LocationId) {
        self.defaults.lock().unwrap().insert(user, location);
    }
}
