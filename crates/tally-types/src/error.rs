use thiserror::Error;

/// Errors produced when a raw value cannot become a ledger type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("item name must be a non-empty, non-blank string")]
    BlankItemName,

    #[error("expected a string, found {found}")]
    NotAString { found: &'static str },

    #[error("expected an integer, found {found}")]
    NotAnInteger { found: String },

    #[error("expected a non-negative integer, found {value}")]
    Negative { value: i64 },
}

/// Short name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
