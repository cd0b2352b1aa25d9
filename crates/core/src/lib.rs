//! `stockdesk-core`: shared domain building blocks.
//!
//! Identifiers, the domain error model and the small traits the domain crates
//! build on. No infrastructure concerns live here.

pub mod aggregate;
pub mod error;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use error::{DomainError, DomainResult};
pub use id::{InvoiceId, LocationId, OrderId, TransactionId, UserId, VariationId};
