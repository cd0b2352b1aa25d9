//! A stock adjustment submission and what came of it.

use serde::{Deserialize, Serialize};

use stockdesk_core::{DomainError, DomainResult, LocationId, OrderId, TransactionId, UserId};

use crate::rows::ensure_rows;
use crate::{LineEntry, RowError};

/// The button the user pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    #[serde(alias = "Sell")]
    Sell,
    #[serde(alias = "Return")]
    Return,
    #[serde(alias = "Fill")]
    Fill,
    #[serde(alias = "Move")]
    Move,
    #[serde(alias = "Delete")]
    Delete,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::Sell,
        OperationKind::Return,
        OperationKind::Fill,
        OperationKind::Move,
        OperationKind::Delete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Sell => "Sell",
            OperationKind::Return => "Return",
            OperationKind::Fill => "Fill",
            OperationKind::Move => "Move",
            OperationKind::Delete => "Delete",
        }
    }
}

impl core::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl core::str::FromStr for OperationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .into_iter()
            .find(|op| op.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown operation '{s}'")))
    }
}

/// One form submission. Immutable once dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub operation: OperationKind,
    pub source_location: LocationId,
    #[serde(default)]
    pub source_zone: Option<String>,
    /// Move only.
    #[serde(default)]
    pub target_location: Option<LocationId>,
    #[serde(default)]
    pub target_zone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    /// Sell/return association.
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub lines: Vec<LineEntry>,
}

impl TransactionRequest {
    pub fn new(operation: OperationKind, source_location: LocationId, lines: Vec<LineEntry>) -> Self {
        Self {
            operation,
            source_location,
            source_zone: None,
            target_location: None,
            target_zone: None,
            note: None,
            order_id: None,
            user_id: None,
            lines,
        }
    }

    pub fn with_target(mut self, location: LocationId, zone: Option<String>) -> Self {
        self.target_location = Some(location);
        self.target_zone = zone;
        self
    }

    pub fn with_source_zone(mut self, zone: impl Into<String>) -> Self {
        self.source_zone = Some(zone.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_order(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn source_zone(&self) -> &str {
        self.source_zone.as_deref().unwrap_or("")
    }

    pub fn target_zone(&self) -> &str {
        self.target_zone.as_deref().unwrap_or("")
    }

    /// A blank note is no note.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Form-level checks; failing any of them means nothing is dispatched.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_rows(&self.lines)?;

        if self.operation == OperationKind::Move && self.target_location.is_none() {
            return Err(DomainError::validation("Move requires a target location"));
        }
        Ok(())
    }
}

/// Result for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub position: usize,
    pub sku: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RowError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
}

impl DispatchOutcome {
    pub fn succeeded(line: &LineEntry, transaction_id: TransactionId) -> Self {
        Self {
            position: line.position,
            sku: line.sku.clone(),
            success: true,
            reason: None,
            transaction_id: Some(transaction_id),
        }
    }

    pub fn failed(line: &LineEntry, reason: RowError) -> Self {
        Self {
            position: line.position,
            sku: line.sku.clone(),
            success: false,
            reason: Some(reason),
            transaction_id: None,
        }
    }

    /// User-facing line, e.g. "SKU: ZZZZ doesn't exist.".
    pub fn message(&self) -> Option<String> {
        match &self.reason {
            None => None,
            Some(RowError::UnknownSku) => Some(format!("SKU: {} doesn't exist.", self.sku)),
            Some(reason) => Some(format!("SKU: {}: {reason}.", self.sku)),
        }
    }
}

/// Per-row results of one dispatch, in row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub operation: OperationKind,
    pub outcomes: Vec<DispatchOutcome>,
}

impl DispatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DispatchOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }

    /// Single summary line for the whole batch.
    pub fn summary(&self) -> String {
        let failed = self.outcomes.len() - self.succeeded_count();
        if failed == 0 {
            format!("Operation: {} succeeded!", self.operation)
        } else {
            format!(
                "Operation: {} applied {} of {} rows; {} failed.",
                self.operation,
                self.succeeded_count(),
                self.outcomes.len(),
                failed
            )
        }
    }
}
