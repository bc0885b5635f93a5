// --- File: crates/barber_admin/src/lib.rs ---

// Declare modules within this crate
pub mod auth;     // Shared-secret authentication for admin routes
pub mod handlers; // Axum handlers for admin tasks
pub mod logic;    // Report windows, user counts, schedule validation
pub mod routes;   // Axum router definition for this crate
#[cfg(feature = "openapi")]
pub mod doc;

#[cfg(test)]
mod auth_test;

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

pub use handlers::AdminState;
