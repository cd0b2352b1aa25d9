use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockdesk_core::{LocationId, OrderId, UserId};
use stockdesk_inventory::{DispatchReport, LineEntry, OperationKind, RowError, TransactionRequest};
use stockdesk_invoicing::{InvoiceEdits, SaveRequest};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddRowRequest {
    pub sku: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct LineInput {
    pub sku: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct SubmitTransactionRequest {
    pub operation: OperationKind,
    pub source_location: LocationId,
    #[serde(default)]
    pub source_zone: Option<String>,
    #[serde(default)]
    pub target_location: Option<LocationId>,
    #[serde(default)]
    pub target_zone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Replaces the stored rows when present.
    #[serde(default)]
    pub lines: Option<Vec<LineInput>>,
}

impl SubmitTransactionRequest {
    /// Split into the submitted rows (if any) and a request whose lines are
    /// filled in from the session.
    pub fn into_parts(self) -> (Option<Vec<LineInput>>, TransactionRequest) {
        let request = TransactionRequest {
            operation: self.operation,
            source_location: self.source_location,
            source_zone: self.source_zone,
            target_location: self.target_location,
            target_zone: self.target_zone,
            note: self.note,
            order_id: self.order_id,
            user_id: self.user_id,
            lines: Vec::new(),
        };
        (self.lines, request)
    }
}

#[derive(Debug, Deserialize)]
pub struct StockLevelQuery {
    pub sku: String,
    pub location: LocationId,
    #[serde(default)]
    pub zone: Option<String>,
}

/// Invoice form submission. An empty string clears an optional field.
#[derive(Debug, Default, Deserialize)]
pub struct SaveInvoiceRequest {
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub confirm: bool,
    /// Version the form was rendered from.
    #[serde(default)]
    pub version: Option<u64>,
}

impl SaveInvoiceRequest {
    pub fn into_save_request(self) -> Result<SaveRequest, axum::response::Response> {
        let email = self.email.map(|e| {
            let e = e.trim().to_string();
            (!e.is_empty()).then_some(e)
        });

        Ok(SaveRequest {
            edits: InvoiceEdits {
                customer: self.customer,
                email,
                invoice_date: self.invoice_date.map(|d| parse_date(&d)).transpose()?,
                due_date: self.due_date.map(|d| parse_date(&d)).transpose()?,
            },
            confirm: self.confirm,
            expected_version: self.version,
        })
    }
}

fn parse_date(s: &str) -> Result<Option<NaiveDate>, axum::response::Response> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Some).map_err(|_| {
        errors::json_error(
            axum::http::StatusCode::BAD_REQUEST,
            "validation_error",
            format!("'{s}' is not a date (expected YYYY-MM-DD)"),
        )
    })
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub position: usize,
    pub sku: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RowError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub operation: OperationKind,
    pub summary: String,
    pub all_succeeded: bool,
    pub outcomes: Vec<OutcomeResponse>,
    /// Rows left in the form afterwards.
    pub rows: Vec<LineEntry>,
}

pub fn report_to_response(report: &DispatchReport, rows: Vec<LineEntry>) -> SubmitResponse {
    SubmitResponse {
        operation: report.operation,
        summary: report.summary(),
        all_succeeded: report.all_succeeded(),
        outcomes: report
            .outcomes
            .iter()
            .map(|o| OutcomeResponse {
                position: o.position,
                sku: o.sku.clone(),
                success: o.success,
                reason: o.reason.clone(),
                message: o.message(),
                transaction_id: o.transaction_id.map(|id| id.to_string()),
            })
            .collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_clear_optional_invoice_fields() {
        let req = SaveInvoiceRequest {
            email: Some("  ".into()),
            invoice_date: Some(String::new()),
            due_date: Some("2026-03-31".into()),
            ..Default::default()
        };

        let save = req.into_save_request().unwrap();
        assert_eq!(save.edits.customer, None);
        assert_eq!(save.edits.email, Some(None));
        assert_eq!(save.edits.invoice_date, Some(None));
        assert_eq!(save.edits.due_date, Some(NaiveDate::from_ymd_opt(2026, 3, 31)));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let req = SaveInvoiceRequest {
            invoice_date: Some("31/03/2026".into()),
            ..Default::default()
        };
        let resp = req.into_save_request().unwrap_err();
        assert_eq!(resp.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn submission_without_lines_uses_session_rows() {
        let body: SubmitTransactionRequest = serde_json::from_value(serde_json::json!({
            "operation": "Move",
            "source_location": 1,
            "target_location": 2,
        }))
        .unwrap();

        let (lines, request) = body.into_parts();
        assert!(lines.is_none());
        assert_eq!(request.operation, OperationKind::Move);
        assert_eq!(request.target_location, Some(LocationId::new(2)));
        assert!(request.lines.is_empty());
    }
}
