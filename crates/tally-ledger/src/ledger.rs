use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use tally_types::{validate_item_name, ItemName, Quantity};

use crate::audit::AuditSink;
use crate::error::LedgerError;

/// What a [`Ledger::remove`] call did to the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The item was not tracked; nothing changed.
    Absent,
    /// Stock was reduced and some remains.
    Reduced { remaining: Quantity },
    /// Stock reached zero or below and the item was dropped.
    Depleted { previous: Quantity },
}

/// In-memory stock ledger: item name to quantity, in insertion order.
///
/// Invariants maintained by the mutation methods:
/// - every key is a non-blank [`ItemName`];
/// - `remove` never leaves an item at zero: an item whose stock would reach
///   zero or below is deleted instead.
///
/// `add(item, 0)` on an untracked item is the one way to store a zero entry.
/// The asymmetry with `remove` is kept for compatibility with existing
/// snapshot files.
///
/// The ledger holds no lock. Callers sharing one across threads wrap it in
/// their own `Mutex`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    items: IndexMap<ItemName, Quantity>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from entries that are already valid item names.
    ///
    /// Entries are kept in iteration order. A repeated name keeps its first
    /// position and its last quantity.
    pub fn restore<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ItemName, Quantity)>,
    {
        Self {
            items: entries.into_iter().collect(),
        }
    }

    /// Add `qty` units of `item`, creating the item if it is not tracked.
    ///
    /// Returns the item's new quantity. When `audit` is given, one line of the
    /// form `added {qty} of {item} at {timestamp}` is recorded to it; with
    /// `None` the line is dropped.
    pub fn add(
        &mut self,
        item: &str,
        qty: i64,
        audit: Option<&mut dyn AuditSink>,
    ) -> Result<Quantity, LedgerError> {
        check_item(item)?;
        let qty = Quantity::try_from(qty).map_err(|_| {
            LedgerError::InvalidQuantity(format!("{qty} is negative; must be >= 0"))
        })?;

        let current = self.items.get(item).copied().unwrap_or(0);
        let total = current.checked_add(qty).ok_or_else(|| {
            LedgerError::InvalidQuantity(format!(
                "adding {qty} to {current} of {item:?} overflows"
            ))
        })?;

        match self.items.get_mut(item) {
            Some(stored) => *stored = total,
            None => {
                let name = ItemName::new(item)
                    .map_err(|e| LedgerError::InvalidItem(e.to_string()))?;
                self.items.insert(name, total);
            }
        }

        debug!(item, qty, total, "stock added");
        if let Some(sink) = audit {
            let at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            sink.record(format!("added {qty} of {item} at {at}"));
        }
        Ok(total)
    }

    /// Remove `qty` units of `item`.
    ///
    /// Removing an untracked item is not an error: it is logged at `WARN` and
    /// reported as [`RemoveOutcome::Absent`].
    pub fn remove(&mut self, item: &str, qty: i64) -> Result<RemoveOutcome, LedgerError> {
        check_item(item)?;
        if qty <= 0 {
            return Err(LedgerError::InvalidQuantity(format!(
                "{qty} is not positive; must be > 0"
            )));
        }
        let qty = qty as Quantity;

        let Some(current) = self.items.get(item).copied() else {
            warn!(item, qty, "remove of untracked item ignored");
            return Ok(RemoveOutcome::Absent);
        };

        if current > qty {
            let remaining = current - qty;
            if let Some(stored) = self.items.get_mut(item) {
                *stored = remaining;
            }
            debug!(item, qty, remaining, "stock removed");
            Ok(RemoveOutcome::Reduced { remaining })
        } else {
            self.items.shift_remove(item);
            debug!(item, qty, previous = current, "stock depleted; item dropped");
            Ok(RemoveOutcome::Depleted { previous: current })
        }
    }

    /// Stored quantity of `item`, or 0 when it is not tracked.
    pub fn quantity_of(&self, item: &str) -> Result<Quantity, LedgerError> {
        check_item(item)?;
        Ok(self.items.get(item).copied().unwrap_or(0))
    }

    /// Tracked items whose quantity is strictly below `threshold`, in
    /// insertion order.
    pub fn below_threshold(&self, threshold: i64) -> Result<Vec<ItemName>, LedgerError> {
        let threshold = Quantity::try_from(threshold).map_err(|_| {
            LedgerError::InvalidThreshold(format!("{threshold} is negative; must be >= 0"))
        })?;

        Ok(self
            .items
            .iter()
            .filter(|(_, qty)| **qty < threshold)
            .map(|(name, _)| name.clone())
            .collect())
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over tracked items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemName, Quantity)> + '_ {
        self.items.iter().map(|(name, qty)| (name, *qty))
    }

    /// Owned copy of every entry, in insertion order.
    pub fn entries(&self) -> Vec<(ItemName, Quantity)> {
        self.items
            .iter()
            .map(|(name, qty)| (name.clone(), *qty))
            .collect()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

fn check_item(item: &str) -> Result<(), LedgerError> {
    validate_item_name(item).map_err(|e| LedgerError::InvalidItem(e.to_string()))
}
