//! Foundation types for Tally, an in-process stock ledger.
//!
//! Every other Tally crate depends on `tally-types`. The types here carry the
//! identifier and quantity rules shared by the ledger and its snapshot file.
//!
//! # Key Types
//!
//! - [`ItemName`] — Non-blank item identifier, the ledger's map key
//! - [`Quantity`] — Stored stock count
//! - [`TypeError`] — Failure to coerce a raw value into one of the above
//!
//! Dynamic inputs (JSON documents, command-line text) go through the
//! coercions in [`quantity`] and [`ItemName::from_json`], which keep a
//! wrongly-typed value distinct from an out-of-range one.

pub mod error;
pub mod item;
pub mod quantity;

pub use error::TypeError;
pub use item::{validate_item_name, ItemName};
pub use quantity::{parse_integer, quantity_from_json, Quantity};
