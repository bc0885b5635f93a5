// --- File: crates/barber_common/src/lib.rs ---

// Declare modules within this crate
pub mod models;    // Appointment, working hours, user profile
pub mod error;     // Error taxonomy
pub mod http;      // HTTP response mapping
pub mod services;  // Repository and clock abstractions
pub mod logging;   // Logging utilities

#[cfg(test)]
mod models_proptest;
#[cfg(test)]
mod error_test;

// Re-export error types and utilities for easier access
pub use error::{
    AppError,
    ConflictKind,
    HttpStatusCode,
    validation_error,
};

// Re-export HTTP utilities for easier access
pub use http::ErrorBody;

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};

pub use services::{
    AppointmentRepository,
    BoxFuture,
    Clock,
    FixedClock,
    StoreError,
    SystemClock,
    UserProfileRepository,
    WorkingHoursRepository,
};
