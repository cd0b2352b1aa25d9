//! Invoicing: draft invoices, confirmation and locking.
//!
//! The aggregate in [`invoice`] is pure; [`save`] resolves the outside inputs
//! (acting user, invoice numbers, settings) and drives it.

pub mod invoice;
pub mod save;

pub use invoice::{
    Confirmation, Invoice, InvoiceCommand, InvoiceConfirmed, InvoiceEdits, InvoiceEdited,
    InvoiceEvent, InvoiceView, SaveInvoice,
};
pub use save::{
    InvoiceChange, InvoiceNumberSource, InvoiceRepository, InvoiceSettings, SaveRequest, may_edit_locked, save_invoice,
};
