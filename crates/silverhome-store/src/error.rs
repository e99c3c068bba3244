use thiserror::Error;

/// Errors produced by the store layer.
///
/// Every public operation's failure mode is one of these variants so the
/// UI can branch on the kind: validation and conflict errors are shown
/// inline next to the triggering control, not-found errors prompt a
/// refresh, forbidden errors render a denial, storage errors prompt a
/// retry. None of them should escape to a generic error boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Caller-supplied arguments fail a precondition.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced id does not exist in its collection.
    #[error("{0} not found")]
    NotFound(String),

    /// A uniqueness or overlap invariant would be violated, or the
    /// document snapshot being saved is stale.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The acting user lacks the required role or ownership.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The record is not in a state that permits the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Underlying persistence read/write failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be serialized.
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Reject blank required fields before any load or write happens.
pub(crate) fn require_non_empty(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("{what} must not be empty")));
    }
    Ok(())
}
