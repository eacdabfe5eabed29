//! In-memory stock ledger for Tally.
//!
//! This crate is the heart of Tally. It provides:
//! - [`Ledger`], the insertion-ordered map from item name to quantity
//! - Validated `add` / `remove` mutations and `quantity_of` /
//!   `below_threshold` queries
//! - [`AuditSink`] boundary for human-readable mutation records
//!
//! The ledger performs no I/O. Persisting it is the job of `tally-store`,
//! which callers invoke explicitly.

pub mod audit;
pub mod error;
pub mod ledger;

pub use audit::{AuditSink, TracingAudit};
pub use error::LedgerError;
pub use ledger::{Ledger, RemoveOutcome};
