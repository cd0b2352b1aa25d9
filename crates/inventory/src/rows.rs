//! Rows of a stock adjustment form, kept across round-trips.

use serde::{Deserialize, Serialize};

use stockdesk_core::{DomainError, DomainResult};

use crate::DispatchReport;

/// Why a row was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RowError {
    /// No enabled variation carries the SKU.
    UnknownSku,
    /// Quantity must be a positive whole number.
    InvalidQuantity,
    /// The stock ledger refused the movement.
    Ledger(String),
}

impl core::fmt::Display for RowError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RowError::UnknownSku => f.write_str("unknown SKU"),
            RowError::InvalidQuantity => f.write_str("quantity must be greater than zero"),
            RowError::Ledger(msg) => write!(f, "stock ledger rejected the movement: {msg}"),
        }
    }
}

/// One SKU + quantity pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEntry {
    /// Stable row key; survives removal of other rows.
    pub position: usize,
    pub sku: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RowError>,
}

impl LineEntry {
    pub fn new(position: usize, sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            position,
            sku: sku.into(),
            quantity,
            error: None,
        }
    }

    pub fn is_flagged(&self) -> bool {
        self.error.is_some()
    }
}

/// Ordered rows of one user's in-progress form.
///
/// Rows keep the values the user typed (including ones that failed) so the
/// form can be redisplayed for correction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCollector {
    rows: Vec<LineEntry>,
    next_position: usize,
}

impl RowCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from submitted `(sku, quantity)` pairs, in order.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut collector = Self::new();
        for (sku, quantity) in lines {
            collector.add_row(sku, quantity);
        }
        collector
    }

    /// Append a row; returns its position.
    pub fn add_row(&mut self, sku: impl Into<String>, quantity: i64) -> usize {
        let position = self.next_position;
        self.next_position += 1;
        self.rows.push(LineEntry::new(position, sku, quantity));
        position
    }

    /// Drop the row at `position`. Other rows keep their order and positions.
    pub fn remove_row(&mut self, position: usize) -> Option<LineEntry> {
        let index = self.rows.iter().position(|r| r.position == position)?;
        Some(self.rows.remove(index))
    }

    /// Flag a row for redisplay. Returns false when no such row exists.
    pub fn mark_invalid(&mut self, position: usize, reason: RowError) -> bool {
        match self.rows.iter_mut().find(|r| r.position == position) {
            Some(row) => {
                row.error = Some(reason);
                true
            }
            None => false,
        }
    }

    pub fn clear_flags(&mut self) {
        for row in &mut self.rows {
            row.error = None;
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.next_position = 0;
    }

    pub fn rows(&self) -> &[LineEntry] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A submission needs at least one row.
    pub fn ensure_not_empty(&self) -> DomainResult<()> {
        ensure_rows(&self.rows)
    }

    /// Fold a dispatch result back into the form.
    ///
    /// A fully successful batch empties the form; otherwise failed rows are
    /// flagged and every row stays as entered.
    pub fn apply_report(&mut self, report: &DispatchReport) {
        if report.all_succeeded() {
            self.clear();
            return;
        }

        self.clear_flags();
        for outcome in report.failures() {
            if let Some(reason) = &outcome.reason {
                self.mark_invalid(outcome.position, reason.clone());
            }
        }
    }
}

pub(crate) fn ensure_rows(rows: &[LineEntry]) -> DomainResult<()> {
    if rows.is_empty() {
        Err(DomainError::validation("Please at least provide one entry"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn add_assigns_increasing_positions() {
        let mut rows = RowCollector::new();
        assert_eq!(rows.add_row("A100", 5), 0);
        assert_eq!(rows.add_row("B200", 1), 1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows()[1].sku, "B200");
    }

    #[test]
    fn remove_keeps_remaining_order_and_positions() {
        let mut rows = RowCollector::from_lines([("A", 1), ("B", 2), ("C", 3)]);

        let removed = rows.remove_row(1).unwrap();
        assert_eq!(removed.sku, "B");

        let left: Vec<_> = rows.rows().iter().map(|r| (r.position, r.sku.as_str())).collect();
        assert_eq!(left, vec![(0, "A"), (2, "C")]);
        assert!(rows.remove_row(1).is_none());
    }

    #[test]
    fn mark_invalid_keeps_values() {
        let mut rows = RowCollector::from_lines([("A", 1), ("ZZZZ", 7)]);

        assert!(rows.mark_invalid(1, RowError::UnknownSku));
        assert!(!rows.mark_invalid(5, RowError::UnknownSku));

        let flagged = &rows.rows()[1];
        assert_eq!(flagged.sku, "ZZZZ");
        assert_eq!(flagged.quantity, 7);
        assert_eq!(flagged.error, Some(RowError::UnknownSku));
        assert!(!rows.rows()[0].is_flagged());
    }

    #[test]
    fn empty_form_fails_validation() {
        let rows = RowCollector::new();
        assert!(matches!(rows.ensure_not_empty(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn row_error_serializes_with_kind_tag() {
        let json = serde_json::to_value(RowError::Ledger("no stock".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "ledger", "detail": "no stock"}));

        let json = serde_json::to_value(RowError::UnknownSku).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "unknown_sku"}));
    }

    proptest! {
        /// Adding a row and removing it again leaves the other rows untouched.
        #[test]
        fn add_then_remove_restores_rows(
            existing in prop::collection::vec(("[A-Z0-9]{1,8}", 1i64..100), 0..10),
            sku in "[A-Z0-9]{1,8}",
            qty in -10i64..100,
        ) {
            let mut rows = RowCollector::from_lines(existing);
            let before = rows.rows().to_vec();

            let position = rows.add_row(sku, qty);
            rows.remove_row(position);

            prop_assert_eq!(rows.rows(), before.as_slice());
        }
    }
}
