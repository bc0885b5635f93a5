// --- File: crates/services/barber_backend/src/lib.rs ---
pub mod app_state;

pub use app_state::{with_layers, AppState};
