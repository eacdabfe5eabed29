use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{json_kind, TypeError};

/// Check that `name` is usable as an item identifier without allocating.
///
/// A name is valid when it contains at least one non-whitespace character.
/// Surrounding whitespace is kept as part of the identity: `" apple"` and
/// `"apple"` are different items.
pub fn validate_item_name(name: &str) -> Result<(), TypeError> {
    if name.trim().is_empty() {
        return Err(TypeError::BlankItemName);
    }
    Ok(())
}

/// Identifier of a stocked item.
///
/// The map key is the item's whole identity; there is no separate item
/// record. Construction validates the name, so every `ItemName` in existence
/// is non-blank.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Validate and wrap an item name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        validate_item_name(&name)?;
        Ok(Self(name))
    }

    /// Coerce a dynamically-typed JSON value into an item name.
    ///
    /// Non-string values fail with [`TypeError::NotAString`]; blank strings
    /// fail with [`TypeError::BlankItemName`].
    pub fn from_json(value: &Value) -> Result<Self, TypeError> {
        match value {
            Value::String(s) => Self::new(s.as_str()),
            other => Err(TypeError::NotAString {
                found: json_kind(other),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemName({:?})", self.0)
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets maps keyed by `ItemName` be queried with a plain `&str`.
impl Borrow<str> for ItemName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ItemName {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemName> for String {
    fn from(name: ItemName) -> Self {
        name.0
    }
}

impl PartialEq<str> for ItemName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ItemName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
