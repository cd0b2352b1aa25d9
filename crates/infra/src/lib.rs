//! Infrastructure layer: in-memory adapters for every collaborator the
//! domain crates talk to, plus seed loading.

pub mod catalog;
pub mod invoices;
pub mod ledger;
pub mod seed;
pub mod store;

pub use catalog::InMemoryCatalog;
pub use invoices::{InMemoryInvoiceRepository, SequentialInvoiceNumbers};
pub use ledger::{InMemoryStockLedger, LedgerTransaction, MovementKind};
pub use seed::{Seed, SeedError};
pub use store::{FormSessions, InMemoryKeyedStore, InMemoryPreferences, KeyedStore};
