//! Stock counts and the coercions that produce them from untyped input.

use serde_json::Value;

use crate::error::{json_kind, TypeError};

/// A stored stock count. Never negative by construction.
pub type Quantity = u64;

/// Coerce a JSON value into a stored quantity.
///
/// Only JSON integers qualify: `7` is accepted, while `7.0`, `"7"` and `true`
/// fail with [`TypeError::NotAnInteger`]. Negative integers fail with
/// [`TypeError::Negative`].
pub fn quantity_from_json(value: &Value) -> Result<Quantity, TypeError> {
    let Value::Number(number) = value else {
        return Err(TypeError::NotAnInteger {
            found: json_kind(value).to_string(),
        });
    };

    if let Some(qty) = number.as_u64() {
        return Ok(qty);
    }
    match number.as_i64() {
        Some(value) => Err(TypeError::Negative { value }),
        None => Err(TypeError::NotAnInteger {
            found: json_kind(value).to_string(),
        }),
    }
}

/// Parse command-line style text as a signed integer.
///
/// The sign is kept so the caller can apply its own range rule; only the
/// "is this an integer at all" question is answered here.
pub fn parse_integer(text: &str) -> Result<i64, TypeError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| TypeError::NotAnInteger {
            found: format!("{text:?}"),
        })
}
