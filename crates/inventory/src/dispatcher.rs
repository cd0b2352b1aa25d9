//! Turns a validated batch of rows into stock ledger operations.
//!
//! ```text
//! TransactionRequest
//!   ↓
//! 1. Form-level validation (rows present, Move has a target)
//!   ↓
//! 2. Remember the source location as the user's default
//!   ↓
//! 3. Per row: resolve SKU → check quantity → one ledger call
//!   ↓
//! DispatchReport (one outcome per row, in order)
//! ```
//!
//! A failing row never stops the rows after it, and rows already applied are
//! not rolled back. Each ledger call is attempted exactly once.

use tracing::{info, warn};

use stockdesk_core::{DomainResult, TransactionId, UserId};

use crate::{
    DispatchOutcome, DispatchReport, LineEntry, OperationKind, PreferenceStore, RowError,
    SkuResolver, StockLedger, TransactionRequest, VariationCatalog,
};

pub struct TransactionDispatcher<C, L> {
    catalog: C,
    ledger: L,
}

impl<C, L> TransactionDispatcher<C, L>
where
    C: VariationCatalog,
    L: StockLedger,
{
    pub fn new(catalog: C, ledger: L) -> Self {
        Self { catalog, ledger }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Apply `request` on behalf of `acting_user`.
    ///
    /// Returns `Err` only for form-level problems, in which case the ledger was
    /// not touched. Row problems are reported in the returned outcomes.
    pub fn dispatch(
        &self,
        acting_user: UserId,
        request: &TransactionRequest,
        preferences: &dyn PreferenceStore,
    ) -> DomainResult<DispatchReport> {
        request.validate()?;

        if request.operation == OperationKind::Move
            && request.target_location == Some(request.source_location)
            && request.source_zone() == request.target_zone()
        {
            warn!(
                location = %request.source_location,
                zone = request.source_zone(),
                "move with identical source and target"
            );
        }

        preferences.set_default_location(acting_user, request.source_location);

        let resolver = SkuResolver::new(&self.catalog);
        let outcomes: Vec<DispatchOutcome> = request
            .lines
            .iter()
            .map(|line| match self.apply_line(&resolver, acting_user, request, line) {
                Ok(transaction_id) => DispatchOutcome::succeeded(line, transaction_id),
                Err(reason) => {
                    warn!(
                        operation = %request.operation,
                        sku = %line.sku,
                        position = line.position,
                        %reason,
                        "stock row not applied"
                    );
                    DispatchOutcome::failed(line, reason)
                }
            })
            .collect();

        let report = DispatchReport {
            operation: request.operation,
            outcomes,
        };

        info!(
            operation = %request.operation,
            location = %request.source_location,
            rows = report.outcomes.len(),
            succeeded = report.succeeded_count(),
            "stock transaction dispatched"
        );

        Ok(report)
    }

    fn apply_line(
        &self,
        resolver: &SkuResolver<'_, C>,
        acting_user: UserId,
        request: &TransactionRequest,
        line: &LineEntry,
    ) -> Result<TransactionId, RowError> {
        let variation = resolver.resolve(&line.sku).map_err(|_| RowError::UnknownSku)?;

        if line.quantity <= 0 {
            return Err(RowError::InvalidQuantity);
        }

        let location = request.source_location;
        let zone = request.source_zone();
        let note = request.note();
        let user = request.user_id.or(Some(acting_user));

        let result = match request.operation {
            OperationKind::Fill => {
                self.ledger
                    .receive_stock(variation, location, zone, line.quantity, None, note)
            }
            OperationKind::Sell => self.ledger.sell_stock(
                variation,
                location,
                zone,
                line.quantity,
                None,
                request.order_id,
                user,
                note,
            ),
            OperationKind::Return | OperationKind::Delete => self.ledger.return_stock(
                variation,
                location,
                zone,
                line.quantity,
                None,
                request.order_id,
                user,
                note,
            ),
            OperationKind::Move => {
                // `validate` guarantees a target for moves.
                let Some(target) = request.target_location else {
                    return Err(RowError::Ledger("missing move target".to_string()));
                };
                self.ledger.move_stock(
                    variation,
                    location,
                    target,
                    zone,
                    request.target_zone(),
                    line.quantity,
                    None,
                    note,
                )
            }
        };

        result.map_err(|e| RowError::Ledger(e.to_string()))
    }
}
