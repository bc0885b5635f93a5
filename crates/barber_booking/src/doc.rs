// File: crates/barber_booking/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::availability::SlotAvailability;
use crate::logic::{
    BookableDaysResponse, BookingResponse, DaySlotsResponse, HealthResponse, MineQuery,
    SlotsQuery, UserSignInRequest,
};
use crate::orchestrator::BookingRequest;
use barber_common::models::{Appointment, AppointmentStatus, DayHours, UserProfile, WorkingHours};
use barber_common::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_slots_handler,
        crate::handlers::get_days_handler,
        crate::handlers::list_appointments_handler,
        crate::handlers::book_appointment_handler,
        crate::handlers::my_appointments_handler,
        crate::handlers::get_working_hours_handler,
        crate::handlers::record_sign_in_handler,
        crate::handlers::health_handler
    ),
    components(
        schemas(
            SlotsQuery,
            MineQuery,
            DaySlotsResponse,
            SlotAvailability,
            BookableDaysResponse,
            BookingRequest,
            BookingResponse,
            UserSignInRequest,
            HealthResponse,
            Appointment,
            AppointmentStatus,
            WorkingHours,
            DayHours,
            UserProfile,
            ErrorBody
        )
    ),
    tags(
        (name = "Booking", description = "Slots, bookings and working hours")
    ),
    servers(
        (url = "/api", description = "Booking API server")
    )
)]
pub struct BookingApiDoc;
