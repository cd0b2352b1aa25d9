//! Saving an invoice from the edit form.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use stockdesk_auth::{Permission, Principal, authorize};
use stockdesk_core::{Aggregate, DomainError, DomainResult, ExpectedVersion, InvoiceId};

use crate::{Confirmation, Invoice, InvoiceCommand, InvoiceEdits, InvoiceEvent, SaveInvoice};

/// Change applied to a stored invoice by [`InvoiceRepository::modify`].
pub type InvoiceChange<'a> = dyn FnMut(&mut Invoice) -> DomainResult<Vec<InvoiceEvent>> + 'a;

/// Invoice storage.
pub trait InvoiceRepository: Send + Sync {
    fn get(&self, id: InvoiceId) -> Option<Invoice>;
    fn put(&self, invoice: Invoice);

    /// Apply `change` to the stored invoice with no other writer in between.
    /// The result is stored only when `change` succeeds. `NotFound` if there
    /// is no such invoice.
    fn modify(&self, id: InvoiceId, change: &mut InvoiceChange<'_>) -> DomainResult<(Invoice, Vec<InvoiceEvent>)>;
}

/// Issues invoice numbers. Every call consumes a number.
pub trait InvoiceNumberSource: Send + Sync {
    fn next_number(&self, invoice_date: NaiveDate) -> String;
}

impl<S> InvoiceRepository for Arc<S>
where
    S: InvoiceRepository + ?Sized,
{
    fn get(&self, id: InvoiceId) -> Option<Invoice> {
        (**self).get(id)
    }

    fn put(&self, invoice: Invoice) {
        (**self).put(invoice)
    }

    fn modify(&self, id: InvoiceId, change: &mut InvoiceChange<'_>) -> DomainResult<(Invoice, Vec<InvoiceEvent>)> {
        (**self).modify(id, change)
    }
}

impl<S> InvoiceNumberSource for Arc<S>
where
    S: InvoiceNumberSource + ?Sized,
{
    fn next_number(&self, invoice_date: NaiveDate) -> String {
        (**self).next_number(invoice_date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceSettings {
    /// Days between invoice date and due date when confirming.
    pub due_days: u32,
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self { due_days: 30 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveRequest {
    pub edits: InvoiceEdits,
    pub confirm: bool,
    /// Version the form was rendered from.
    pub expected_version: Option<u64>,
}

pub fn may_edit_locked(principal: &Principal) -> bool {
    principal.has_permission(&Permission::EDIT_LOCKED_INVOICE)
}

/// Validate, optionally confirm, and store an invoice.
///
/// Runs as one read-modify-write on the repository, so concurrent saves of
/// the same invoice see each other's result and a number is drawn at most
/// once per confirmation.
pub fn save_invoice(
    invoices: &dyn InvoiceRepository,
    numbers: &dyn InvoiceNumberSource,
    settings: InvoiceSettings,
    principal: &Principal,
    id: InvoiceId,
    request: SaveRequest,
    now: DateTime<Utc>,
) -> DomainResult<(Invoice, Vec<InvoiceEvent>)> {
    authorize(principal, &Permission::EDIT_INVOICE).map_err(|_| DomainError::Unauthorized)?;
    let may_edit_locked = may_edit_locked(principal);

    let (invoice, events) = invoices.modify(id, &mut |invoice: &mut Invoice| {
        let mut cmd = SaveInvoice {
            invoice_id: id,
            edits: request.edits.clone(),
            confirm: None,
            expected_version: ExpectedVersion::from(request.expected_version),
            may_edit_locked,
            occurred_at: now,
        };
        invoice.check_save(&cmd)?;

        if request.confirm && !invoice.is_locked() {
            let today = now.date_naive();
            let invoice_date = cmd
                .edits
                .invoice_date
                .unwrap_or(invoice.invoice_date())
                .unwrap_or(today);
            cmd.confirm = Some(Confirmation {
                number: numbers.next_number(invoice_date),
                today,
                due_days: settings.due_days,
            });
        }

        invoice.execute(&InvoiceCommand::Save(cmd))
    })?;

    info!(
        invoice = %id,
        user = %principal.user_id(),
        confirmed = invoice.is_locked(),
        number = invoice.number().unwrap_or(""),
        "invoice saved"
    );

    Ok((invoice, events))
}
