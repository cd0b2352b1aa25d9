//! In-memory invoice storage and numbering.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Datelike, NaiveDate};

use stockdesk_core::{DomainError, DomainResult, InvoiceId};
use stockdesk_invoicing::{Invoice, InvoiceChange, InvoiceEvent, InvoiceNumberSource, InvoiceRepository};

use crate::{InMemoryKeyedStore, KeyedStore};

#[derive(Debug, Default)]
pub struct InMemoryInvoiceRepository {
    invoices: InMemoryKeyedStore<InvoiceId, Invoice>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InvoiceRepository for InMemoryInvoiceRepository {
    fn get(&self, id: InvoiceId) -> Option<Invoice> {
        self.invoices.get(&id)
    }

    fn put(&self, invoice: Invoice) {
        self.invoices.upsert(invoice.id_typed(), invoice);
    }

    fn modify(&self, id: InvoiceId, change: &mut InvoiceChange<'_>) -> DomainResult<(Invoice, Vec<InvoiceEvent>)> {
        self.invoices
            .modify(&id, |stored| {
                let mut invoice = stored.clone();
                let events = change(&mut invoice)?;
                *stored = invoice.clone();
                Ok((invoice, events))
            })
            .unwrap_or(Err(DomainError::NotFound))
    }
}

/// `<year>-<sequence>` numbers; the sequence restarts every year.
#[derive(Debug, Default)]
pub struct SequentialInvoiceNumbers {
    last: Mutex<HashMap<i32, u32>>,
}

impl SequentialInvoiceNumbers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue an existing series, e.g. after loading issued invoices.
    pub fn starting_after(year: i32, last: u32) -> Self {
        Self {
            last: Mutex::new(HashMap::from([(year, last)])),
        }
    }
}

impl InvoiceNumberSource for SequentialInvoiceNumbers {
    fn next_number(&self, invoice_date: NaiveDate) -> String {
        let year = invoice_date.year();
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let seq = last.entry(year).or_insert(0);
        *seq += 1;
        format!("{year}-{seq:05}")
    }
}
