//! Error types for the database client

use barber_common::{ConflictKind, StoreError};
use thiserror::Error;

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// A unique index on active appointments rejected the write
    #[error("Constraint violated: {0}")]
    Conflict(ConflictKind),

    /// A stored value could not be decoded
    #[error("Malformed row: {0}")]
    Malformed(String),
}

impl DbError {
    /// Classifies a failed statement on the appointments table.
    ///
    /// SQLite names the indexed columns in its message, so a violation that
    /// mentions `identity_key` is the one-per-identity index; any other
    /// unique violation is the slot index.
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let kind = if db_err.message().contains("identity_key") {
                    ConflictKind::AlreadyBooked
                } else {
                    ConflictKind::SlotTaken
                };
                return DbError::Conflict(kind);
            }
        }
        DbError::QueryError(err.to_string())
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(kind) => StoreError::Conflict(kind),
            DbError::Malformed(detail) => StoreError::Malformed(detail),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}
