//! Snapshot persistence for the Tally stock ledger.
//!
//! A snapshot is the whole ledger written as one flat JSON object, for
//! example `{"apple":7,"banana":2}`. There is no metadata, no versioning, and
//! no partial update: every save rewrites the document and every load
//! replaces the ledger.
//!
//! # Design Rules
//!
//! 1. Write-then-rename: a save writes `<target><suffix>` next to the target,
//!    syncs and closes it, then renames it over the target. The target always
//!    holds either its previous complete contents or the new ones.
//! 2. A missing snapshot file is "nothing to load", not an error.
//! 3. A snapshot that fails validation empties the ledger it was loaded into.
//! 4. The store keeps no state between calls.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod config;
pub mod error;
pub mod snapshot;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use snapshot::{load, save, LoadOutcome, SnapshotStore};
