//! Service wiring: in-memory adapters plus the domain services built on them.

use std::sync::Arc;

use stockdesk_infra::{
    FormSessions, InMemoryCatalog, InMemoryInvoiceRepository, InMemoryPreferences,
    InMemoryStockLedger, Seed, SeedError, SequentialInvoiceNumbers,
};
use stockdesk_inventory::{SUGGESTION_LIMIT, StockControlForm};
use stockdesk_invoicing::InvoiceSettings;

pub struct AppServices {
    pub catalog: Arc<InMemoryCatalog>,
    pub ledger: Arc<InMemoryStockLedger>,
    pub preferences: Arc<InMemoryPreferences>,
    pub sessions: FormSessions,
    pub form: StockControlForm,
    pub invoices: InMemoryInvoiceRepository,
    pub numbers: SequentialInvoiceNumbers,
    pub invoice_settings: InvoiceSettings,
    pub autocomplete_limit: usize,
}

impl AppServices {
    /// Empty stores with default settings.
    pub fn in_memory() -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        let ledger = Arc::new(InMemoryStockLedger::new(catalog.clone()));
        let preferences = Arc::new(InMemoryPreferences::new());

        let form = StockControlForm::new(
            catalog.clone(),
            catalog.clone(),
            ledger.clone(),
            preferences.clone(),
        );

        Self {
            catalog,
            ledger,
            preferences,
            sessions: FormSessions::new(),
            form,
            invoices: InMemoryInvoiceRepository::new(),
            numbers: SequentialInvoiceNumbers::new(),
            invoice_settings: InvoiceSettings::default(),
            autocomplete_limit: SUGGESTION_LIMIT,
        }
    }

    pub fn from_seed(seed: &Seed) -> Result<Self, SeedError> {
        let services = Self::in_memory();
        seed.apply(&services.catalog, &services.ledger, &services.invoices)?;
        Ok(services)
    }

    pub fn with_invoice_due_days(mut self, due_days: u32) -> Self {
        self.invoice_settings.due_days = due_days;
        self
    }

    pub fn with_autocomplete_limit(mut self, limit: usize) -> Self {
        self.autocomplete_limit = limit.min(SUGGESTION_LIMIT);
        self
    }
}
