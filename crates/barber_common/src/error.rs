// --- File: crates/barber_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

use crate::services::StoreError;

/// Which uniqueness rule a booking ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Another active appointment occupies the same date and time.
    SlotTaken,
    /// The identity already holds an active appointment.
    AlreadyBooked,
}

impl ConflictKind {
    /// The message shown to the customer.
    pub fn public_message(&self) -> &'static str {
        match self {
            ConflictKind::SlotTaken => "Slot already booked",
            ConflictKind::AlreadyBooked => "Already booked",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::SlotTaken => write!(f, "slot taken"),
            ConflictKind::AlreadyBooked => write!(f, "already booked"),
        }
    }
}

/// The error type every handler returns.
///
/// Domain crates convert their own errors into one of these variants; the
/// HTTP layer only ever sees `AppError`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed input the caller can correct.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The requested slot or identity is already taken by an active appointment.
    #[error("Conflict: {0}")]
    ConflictError(ConflictKind),

    /// The store could not be reached or rejected the write.
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// The message that is safe to put in a response body.
    ///
    /// Persistence and internal failures never leak their detail.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) => msg.clone(),
            AppError::ConflictError(kind) => kind.public_message().to_string(),
            AppError::PersistenceError(_) => "DB error".to_string(),
            AppError::NotFoundError(msg) => msg.clone(),
            AppError::ConfigError(msg) => msg.clone(),
            AppError::AuthError(_) => "Unauthorized".to_string(),
            AppError::InternalError(_) => "Internal server error".to_string(),
        }
    }
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for AppError {
    fn status_code(&self) -> u16 {
        match self {
            AppError::ValidationError(_) => 400,
            AppError::ConflictError(_) => 409,
            AppError::PersistenceError(_) => 500,
            AppError::NotFoundError(_) => 404,
            AppError::ConfigError(_) => 500,
            AppError::AuthError(_) => 401,
            AppError::InternalError(_) => 500,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(kind) => AppError::ConflictError(kind),
            StoreError::NotFound(id) => AppError::NotFoundError(format!("Appointment {} not found", id)),
            StoreError::Unavailable(msg) => AppError::PersistenceError(msg),
            StoreError::Malformed(msg) => AppError::PersistenceError(format!("malformed record: {}", msg)),
        }
    }
}

pub fn validation_error<T: fmt::Display>(message: T) -> AppError {
    AppError::ValidationError(message.to_string())
}
