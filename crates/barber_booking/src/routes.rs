// --- File: crates/barber_booking/src/routes.rs ---

use crate::handlers::{
    book_appointment_handler, get_days_handler, get_slots_handler, get_working_hours_handler,
    health_handler, list_appointments_handler, my_appointments_handler, record_sign_in_handler,
    BookingState,
};
use crate::orchestrator::{BookingRules, BookingService};
use axum::{
    routing::{get, post},
    Router,
};
use barber_common::{AppError, AppointmentRepository, Clock, UserProfileRepository, WorkingHoursRepository};
use barber_config::AppConfig;
use std::sync::Arc;

impl BookingState {
    /// Resolves the booking rules from configuration and wires the stores in.
    pub fn new(
        config: &AppConfig,
        appointments: Arc<dyn AppointmentRepository>,
        working_hours: Arc<dyn WorkingHoursRepository>,
        users: Arc<dyn UserProfileRepository>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let rules = BookingRules::from_config(&config.booking)?;
        Ok(Self {
            service: BookingService::new(appointments, working_hours, clock, rules),
            users,
        })
    }
}

/// Customer-facing routes, to be nested under `/api`.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/slots", get(get_slots_handler))
        .route("/days", get(get_days_handler))
        .route(
            "/appointments",
            get(list_appointments_handler).post(book_appointment_handler),
        )
        .route("/appointments/mine", get(my_appointments_handler))
        .route("/working-hours", get(get_working_hours_handler))
        .route("/users", post(record_sign_in_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
