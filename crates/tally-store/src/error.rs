use std::path::PathBuf;

/// Errors from snapshot persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The snapshot file exists but is not a flat object of item names to
    /// non-negative integers. The ledger passed to `load` has been cleared.
    #[error("snapshot {} failed schema validation: {reason}", .path.display())]
    SchemaInvalid { path: PathBuf, reason: String },

    /// I/O error while reading, writing, or renaming.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The ledger could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The store configuration is unusable.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
