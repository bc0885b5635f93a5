// File: crates/barber_booking/src/handlers.rs
use crate::logic::{
    active_for, bookable_days, day_slots, parse_date, BookableDaysResponse, BookingResponse,
    DaySlotsResponse, HealthResponse, MineQuery, SlotsQuery, UserSignInRequest,
};
use crate::orchestrator::{BookingRequest, BookingService};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::Json,
};
use barber_common::models::{Appointment, Identity, UserProfile, WorkingHours};
use barber_common::{validation_error, AppError, UserProfileRepository};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

// Shared state for the customer-facing handlers
pub struct BookingState {
    pub service: BookingService,
    pub users: Arc<dyn UserProfileRepository>,
}

/// Slots of a day with their availability.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/slots",
    params(SlotsQuery),
    responses(
        (status = 200, description = "Generated slots with availability", body = DaySlotsResponse),
        (status = 400, description = "Invalid date"),
        (status = 500, description = "DB error")
    ),
    tag = "Booking"
))]
pub async fn get_slots_handler(
    State(state): State<Arc<BookingState>>,
    query: Result<Query<SlotsQuery>, QueryRejection>,
) -> Result<Json<DaySlotsResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| validation_error(rejection.body_text()))?;
    let date = parse_date(&query.date)?;
    Ok(Json(day_slots(&state.service, date).await?))
}

/// Dates a customer can pick in the calendar.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/days",
    responses(
        (status = 200, description = "Open days inside the booking window", body = BookableDaysResponse),
        (status = 500, description = "DB error")
    ),
    tag = "Booking"
))]
pub async fn get_days_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<BookableDaysResponse>, AppError> {
    let days = bookable_days(&state.service)
        .await?
        .into_iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    Ok(Json(BookableDaysResponse { days }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments",
    responses(
        (status = 200, description = "All appointments", body = [Appointment]),
        (status = 500, description = "DB error")
    ),
    tag = "Booking"
))]
pub async fn list_appointments_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    Ok(Json(state.service.appointments().list_all().await?))
}

/// Books a slot.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Booked", body = BookingResponse),
        (status = 400, description = "Missing fields or invalid date/time"),
        (status = 409, description = "Slot already booked, or identity already holds an appointment"),
        (status = 500, description = "DB error")
    ),
    tag = "Booking"
))]
pub async fn book_appointment_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Unreadable booking body: {}", rejection);
        validation_error("Missing fields")
    })?;

    state.service.book(request).await?;
    Ok((StatusCode::CREATED, Json(BookingResponse { success: true })))
}

/// Active appointments of the signed-in customer.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments/mine",
    params(MineQuery),
    responses(
        (status = 200, description = "Active appointments, newest first", body = [Appointment]),
        (status = 400, description = "Neither email nor uid given"),
        (status = 500, description = "DB error")
    ),
    tag = "Booking"
))]
pub async fn my_appointments_handler(
    State(state): State<Arc<BookingState>>,
    query: Result<Query<MineQuery>, QueryRejection>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let Query(query) = query.map_err(|rejection| validation_error(rejection.body_text()))?;
    let identity = match (query.email.as_deref(), query.uid.as_deref()) {
        (Some(email), _) if !email.trim().is_empty() => Identity::email(email),
        (_, Some(uid)) if !uid.trim().is_empty() => Identity::user_id(uid),
        _ => return Err(validation_error("email or uid is required")),
    };
    Ok(Json(active_for(&state.service, &identity).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/working-hours",
    responses(
        (status = 200, description = "Weekly schedule", body = WorkingHours),
        (status = 500, description = "DB error")
    ),
    tag = "Booking"
))]
pub async fn get_working_hours_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<WorkingHours>, AppError> {
    Ok(Json(state.service.working_hours().get_or_init().await?))
}

/// Records a sign-in reported by the identity provider.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/users",
    request_body = UserSignInRequest,
    responses(
        (status = 200, description = "Stored profile", body = UserProfile),
        (status = 400, description = "Missing uid"),
        (status = 500, description = "DB error")
    ),
    tag = "Booking"
))]
pub async fn record_sign_in_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<UserSignInRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Unreadable sign-in body: {}", rejection);
        validation_error("uid is required")
    })?;
    let uid = request.uid.trim();
    if uid.is_empty() {
        return Err(validation_error("uid is required"));
    }

    let now = state.service.clock().now();
    let created_at = match request.created_at.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| validation_error("Invalid created_at (RFC 3339)"))?,
        None => now,
    };

    let profile = UserProfile {
        uid: uid.to_string(),
        display_name: request.display_name.filter(|n| !n.trim().is_empty()),
        email: request
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty()),
        created_at,
        last_sign_in_at: now,
    };

    let stored = state.users.upsert(profile).await?;
    info!("Recorded sign-in for user {}", stored.uid);
    Ok(Json(stored))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 500, description = "DB error")
    ),
    tag = "Booking"
))]
pub async fn health_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<HealthResponse>, AppError> {
    state.service.appointments().ping().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
