// --- File: crates/barber_booking/src/lib.rs ---
// Declare modules within this crate
pub mod availability;
pub mod doc;
pub mod handlers;
pub mod logic;
pub mod orchestrator;
#[cfg(test)]
mod orchestrator_test;
pub mod routes;
pub mod slots;
#[cfg(test)]
mod slots_proptest;

pub use handlers::BookingState;
pub use orchestrator::{BookingError, BookingRequest, BookingRules, BookingService, BookingStage, RejectReason};
pub use routes::routes;
