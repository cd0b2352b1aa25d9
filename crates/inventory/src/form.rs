//! The stock inventory control form: location options, SKU suggestions, and
//! submission of a batch of rows.

use std::sync::Arc;

use serde::Serialize;

use stockdesk_auth::Principal;
use stockdesk_core::{DomainError, DomainResult, LocationId};

use crate::{
    DispatchReport, LineEntry, LocationDirectory, LocationOptions, OperationKind, PreferenceStore,
    RowCollector, SkuResolver, StockLedger, TransactionDispatcher, TransactionRequest,
    VariationCatalog, ensure_selectable, visible_locations,
};

/// What the form shows a given user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub locations: LocationOptions,
    /// Last used source location, when it is still selectable.
    pub default_location: Option<LocationId>,
    pub operations: Vec<OperationKind>,
    pub rows: Vec<LineEntry>,
}

pub struct StockControlForm {
    locations: Arc<dyn LocationDirectory>,
    preferences: Arc<dyn PreferenceStore>,
    dispatcher: TransactionDispatcher<Arc<dyn VariationCatalog>, Arc<dyn StockLedger>>,
}

impl StockControlForm {
    pub fn new(
        catalog: Arc<dyn VariationCatalog>,
        locations: Arc<dyn LocationDirectory>,
        ledger: Arc<dyn StockLedger>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            locations,
            preferences,
            dispatcher: TransactionDispatcher::new(catalog, ledger),
        }
    }

    /// Locations `principal` may use as source or target.
    pub fn location_options(&self, principal: &Principal) -> LocationOptions {
        let all = self.locations.find_active_locations();
        visible_locations(principal, &all)
    }

    pub fn view(&self, principal: &Principal, rows: &RowCollector) -> FormView {
        let locations = self.location_options(principal);
        let default_location = self
            .preferences
            .default_location(principal.user_id())
            .filter(|id| locations.contains_key(id));

        FormView {
            locations,
            default_location,
            operations: OperationKind::ALL.to_vec(),
            rows: rows.rows().to_vec(),
        }
    }

    pub fn suggest_skus(&self, query: &str, limit: usize) -> Vec<String> {
        SkuResolver::new(self.dispatcher.catalog()).suggest(query, limit)
    }

    /// Quantity on hand for `sku` at `location`.
    pub fn stock_level(&self, sku: &str, location: LocationId, zone: Option<&str>) -> DomainResult<i64> {
        let variation = SkuResolver::new(self.dispatcher.catalog())
            .resolve(sku)
            .map_err(|_| DomainError::not_found())?;
        Ok(self.dispatcher.ledger().stock_level(variation, location, zone))
    }

    /// Check the request against what `principal` may touch, then dispatch.
    pub fn submit(&self, principal: &Principal, request: &TransactionRequest) -> DomainResult<DispatchReport> {
        request.validate()?;

        let options = self.location_options(principal);
        ensure_selectable(&options, request.source_location)?;
        if let (OperationKind::Move, Some(target)) = (request.operation, request.target_location) {
            ensure_selectable(&options, target)?;
        }

        self.dispatcher
            .dispatch(principal.user_id(), request, &*self.preferences)
    }

    /// Submit the collector's rows and fold the result back into it.
    pub fn submit_rows(
        &self,
        principal: &Principal,
        rows: &mut RowCollector,
        mut request: TransactionRequest,
    ) -> DomainResult<DispatchReport> {
        rows.ensure_not_empty()?;
        request.lines = rows.rows().to_vec();

        let report = self.submit(principal, &request)?;
        rows.apply_report(&report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use stockdesk_auth::Permission;
    use stockdesk_core::UserId;

    use super::*;
    use crate::test_support::{FakeCatalog, FakeLedger, FakeLocations, FakePreferences};
    use crate::{RowError, StockLocation, VariationStatus};

    struct Fixture {
        form: StockControlForm,
        ledger: Arc<FakeLedger>,
        manager: UserId,
    }

    fn fixture() -> Fixture {
        let manager = UserId::new();
        let catalog = FakeCatalog::new()
            .with("A100", 1, VariationStatus::Enabled)
            .with("A101", 2, VariationStatus::Enabled);
        let locations = FakeLocations(vec![
            StockLocation {
                id: LocationId::new(1),
                name: "Main".into(),
                managers: vec![manager],
                active: true,
            },
            StockLocation {
                id: LocationId::new(2),
                name: "Annex".into(),
                managers: vec![],
                active: true,
            },
            StockLocation {
                id: LocationId::new(3),
                name: "Closed".into(),
                managers: vec![manager],
                active: false,
            },
        ]);
        let ledger = Arc::new(FakeLedger::new());

        let form = StockControlForm::new(
            Arc::new(catalog),
            Arc::new(locations),
            ledger.clone(),
            Arc::new(FakePreferences::default()),
        );

        Fixture { form, ledger, manager }
    }

    fn own_location_editor(user: UserId) -> Principal {
        Principal::new(user, [Permission::EDIT_STOCK_OWN_LOCATION])
    }

    #[test]
    fn view_lists_managed_active_locations() {
        let fx = fixture();
        let view = fx.form.view(&own_location_editor(fx.manager), &RowCollector::new());

        assert_eq!(view.locations.keys().copied().collect::<Vec<_>>(), vec![LocationId::new(1)]);
        assert_eq!(view.default_location, None);
        assert_eq!(view.operations.len(), 5);
    }

    #[test]
    fn submit_rejects_location_outside_options() {
        let fx = fixture();
        let principal = own_location_editor(fx.manager);
        let mut rows = RowCollector::from_lines([("A100", 1)]);

        let req = TransactionRequest::new(OperationKind::Fill, LocationId::new(2), vec![]);
        let err = fx.form.submit_rows(&principal, &mut rows, req).unwrap_err();

        assert_eq!(err, DomainError::Unauthorized);
        assert!(fx.ledger.calls().is_empty());
    }

    #[test]
    fn move_target_must_be_selectable() {
        let fx = fixture();
        let principal = own_location_editor(fx.manager);
        let mut rows = RowCollector::from_lines([("A100", 1)]);

        let req = TransactionRequest::new(OperationKind::Move, LocationId::new(1), vec![])
            .with_target(LocationId::new(2), None);
        assert_eq!(
            fx.form.submit_rows(&principal, &mut rows, req),
            Err(DomainError::Unauthorized)
        );
    }

    #[test]
    fn failed_rows_stay_flagged_and_default_is_remembered() {
        let fx = fixture();
        let principal = own_location_editor(fx.manager);
        let mut rows = RowCollector::from_lines([("A100", 5), ("ZZZZ", 2)]);

        let req = TransactionRequest::new(OperationKind::Fill, LocationId::new(1), vec![]);
        let report = fx.form.submit_rows(&principal, &mut rows, req).unwrap();

        assert_eq!(report.succeeded_count(), 1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows()[1].error, Some(RowError::UnknownSku));
        assert_eq!(rows.rows()[1].quantity, 2);

        let view = fx.form.view(&principal, &rows);
        assert_eq!(view.default_location, Some(LocationId::new(1)));
    }

    #[test]
    fn successful_batch_clears_rows() {
        let fx = fixture();
        let principal = Principal::new(UserId::new(), [Permission::ADMINISTER_STOCK]);
        let mut rows = RowCollector::from_lines([("A100", 5), ("A101", 1)]);

        let req = TransactionRequest::new(OperationKind::Fill, LocationId::new(2), vec![]);
        let report = fx.form.submit_rows(&principal, &mut rows, req).unwrap();

        assert!(report.all_succeeded());
        assert!(rows.is_empty());
        assert_eq!(fx.ledger.calls().len(), 2);
    }

    #[test]
    fn empty_form_is_rejected_before_dispatch() {
        let fx = fixture();
        let principal = own_location_editor(fx.manager);
        let mut rows = RowCollector::new();

        let req = TransactionRequest::new(OperationKind::Fill, LocationId::new(1), vec![]);
        assert!(matches!(
            fx.form.submit_rows(&principal, &mut rows, req),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn suggestions_and_stock_level() {
        let fx = fixture();
        assert_eq!(fx.form.suggest_skus("a10", 20), vec!["A100", "A101"]);
        assert_eq!(fx.form.stock_level("A100", LocationId::new(1), None), Ok(0));
        assert_eq!(
            fx.form.stock_level("NOPE", LocationId::new(1), None),
            Err(DomainError::NotFound)
        );
    }
}
