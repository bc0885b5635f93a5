// --- File: crates/barber_booking/src/logic.rs ---
use crate::availability::{available_slots, SlotAvailability};
use crate::orchestrator::BookingService;
use crate::slots::generate_slots;
use barber_common::models::{Appointment, Identity};
use barber_common::{validation_error, AppError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Data Structures ---
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SlotsQuery {
    /// Date in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-06-02"))]
    pub date: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DaySlotsResponse {
    #[cfg_attr(feature = "openapi", schema(example = "2025-06-02"))]
    pub date: String,
    /// The weekday is open in the working hours.
    pub open: bool,
    /// The date lies inside the booking window.
    pub bookable: bool,
    pub slots: Vec<SlotAvailability>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookableDaysResponse {
    #[cfg_attr(feature = "openapi", schema(example = json!(["2025-06-01", "2025-06-02"])))]
    pub days: Vec<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingResponse {
    pub success: bool,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct MineQuery {
    #[cfg_attr(feature = "openapi", schema(example = "d@x.com"))]
    pub email: Option<String>,
    pub uid: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserSignInRequest {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// Account creation time reported by the identity provider (RFC 3339).
    pub created_at: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HealthResponse {
    pub status: String,
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| validation_error("Invalid date format (YYYY-MM-DD)"))
}

// --- Queries ---

/// Slots of one day with their availability right now.
pub async fn day_slots(service: &BookingService, date: NaiveDate) -> Result<DaySlotsResponse, AppError> {
    let hours = service.working_hours().get_or_init().await?;
    let existing = service.appointments().list_active_on(date).await?;
    let (today, now) = service.clock().local_now(service.rules().time_zone);
    let (first, last) = service.rules().window(today);

    Ok(DaySlotsResponse {
        date: date.format("%Y-%m-%d").to_string(),
        open: hours.for_date(date).open,
        bookable: date >= first && date <= last,
        slots: available_slots(date, &hours, &existing, today.and_time(now)),
    })
}

/// Dates inside the booking window whose weekday produces at least one slot.
pub async fn bookable_days(service: &BookingService) -> Result<Vec<NaiveDate>, AppError> {
    let hours = service.working_hours().get_or_init().await?;
    let (first, last) = service.rules().window(service.today());

    let mut days = Vec::new();
    let mut day = first;
    while day <= last {
        if !generate_slots(day, &hours).is_empty() {
            days.push(day);
        }
        day += Duration::days(1);
    }
    Ok(days)
}

/// Active appointments of `identity`, newest first.
pub async fn active_for(
    service: &BookingService,
    identity: &Identity,
) -> Result<Vec<Appointment>, AppError> {
    let mut mine: Vec<Appointment> = service
        .appointments()
        .list_by_identity(identity)
        .await?
        .into_iter()
        .filter(Appointment::is_active)
        .collect();
    mine.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));
    Ok(mine)
}
