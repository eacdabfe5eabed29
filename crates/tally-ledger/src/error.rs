/// Errors produced by ledger operations.
///
/// Each variant names the argument that was rejected. A wrongly-typed
/// argument coming from a dynamic boundary lands in the same variant as an
/// out-of-range one for that argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid item: {0}")]
    InvalidItem(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
}
