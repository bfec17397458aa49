//! Store error types for `authenticator-store`.

use authenticator_otp::OtpError;
use thiserror::Error;

/// Errors produced by token storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key-URI parsing or code generation failed (delegated from the core).
    #[error(transparent)]
    Otp(#[from] OtpError),

    /// `SQLite` database error.
    #[error("database error: {0}")]
    Database(String),

    /// Migration error during schema upgrade.
    #[error("migration error: {0}")]
    Migration(String),

    /// Token not found by ID.
    #[error("token not found: {0}")]
    TokenNotFound(String),

    /// A reorder referenced positions outside the list.
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}
