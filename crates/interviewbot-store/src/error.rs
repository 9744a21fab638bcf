//! Store error types.

use thiserror::Error;

/// Errors raised by the session store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite rejected the operation.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The database directory could not be prepared.
    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}
