// --- File: crates/barber_admin/src/handlers.rs ---

use crate::logic::{
    check_working_hours, report_since, sort_completed, users_with_counts, AdminUserView,
    CompletedQuery,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use barber_common::models::{Appointment, WorkingHours};
use barber_common::{
    validation_error, AppError, AppointmentRepository, Clock, UserProfileRepository,
    WorkingHoursRepository,
};
use std::sync::Arc;
use tracing::info;

// --- State for Admin Handlers ---
pub struct AdminState {
    pub appointments: Arc<dyn AppointmentRepository>,
    pub working_hours: Arc<dyn WorkingHoursRepository>,
    pub users: Arc<dyn UserProfileRepository>,
    pub clock: Arc<dyn Clock>,
}

fn appointment_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    id.map(|Path(id)| id)
        .map_err(|_| validation_error("Invalid appointment id"))
}

/// Active appointments, ordered by date then time.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/appointments",
    params(("X-Admin-Secret" = String, Header, description = "Admin shared secret")),
    responses(
        (status = 200, description = "Active appointments", body = [Appointment]),
        (status = 401, description = "Missing or invalid admin secret"),
        (status = 500, description = "DB error")
    ),
    tag = "Admin"
))]
pub async fn list_active_handler(
    State(state): State<Arc<AdminState>>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    Ok(Json(state.appointments.list_active().await?))
}

/// Marks an appointment done, freeing its slot and its customer.
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/admin/appointments/{id}/done",
    params(
        ("id" = i64, Path, description = "Appointment id"),
        ("X-Admin-Secret" = String, Header, description = "Admin shared secret")
    ),
    responses(
        (status = 200, description = "The completed appointment", body = Appointment),
        (status = 401, description = "Missing or invalid admin secret"),
        (status = 404, description = "Unknown appointment"),
        (status = 500, description = "DB error")
    ),
    tag = "Admin"
))]
pub async fn mark_done_handler(
    State(state): State<Arc<AdminState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Appointment>, AppError> {
    let id = appointment_id(id)?;
    let done = state.appointments.mark_done(id, state.clock.now()).await?;
    info!("Appointment {} marked done", id);
    Ok(Json(done))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/admin/appointments/{id}",
    params(
        ("id" = i64, Path, description = "Appointment id"),
        ("X-Admin-Secret" = String, Header, description = "Admin shared secret")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing or invalid admin secret"),
        (status = 404, description = "Unknown appointment"),
        (status = 500, description = "DB error")
    ),
    tag = "Admin"
))]
pub async fn delete_appointment_handler(
    State(state): State<Arc<AdminState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = appointment_id(id)?;
    state.appointments.delete(id).await?;
    info!("Appointment {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Appointments completed within the last `days` days, most recent first.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/appointments/completed",
    params(
        CompletedQuery,
        ("X-Admin-Secret" = String, Header, description = "Admin shared secret")
    ),
    responses(
        (status = 200, description = "Completed appointments", body = [Appointment]),
        (status = 400, description = "days out of range"),
        (status = 401, description = "Missing or invalid admin secret"),
        (status = 500, description = "DB error")
    ),
    tag = "Admin"
))]
pub async fn completed_handler(
    State(state): State<Arc<AdminState>>,
    query: Result<Query<CompletedQuery>, QueryRejection>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let Query(query) = query.map_err(|rejection| validation_error(rejection.body_text()))?;
    let since = report_since(state.clock.now(), query.days)?;
    let completed = state.appointments.list_completed_since(since).await?;
    Ok(Json(sort_completed(completed)))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/working-hours",
    params(("X-Admin-Secret" = String, Header, description = "Admin shared secret")),
    responses(
        (status = 200, description = "Weekly schedule", body = WorkingHours),
        (status = 401, description = "Missing or invalid admin secret"),
        (status = 500, description = "DB error")
    ),
    tag = "Admin"
))]
pub async fn get_working_hours_handler(
    State(state): State<Arc<AdminState>>,
) -> Result<Json<WorkingHours>, AppError> {
    Ok(Json(state.working_hours.get_or_init().await?))
}

/// Replaces the whole weekly schedule.
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/admin/working-hours",
    request_body = WorkingHours,
    params(("X-Admin-Secret" = String, Header, description = "Admin shared secret")),
    responses(
        (status = 200, description = "Saved schedule", body = WorkingHours),
        (status = 400, description = "Open day without a valid range"),
        (status = 401, description = "Missing or invalid admin secret"),
        (status = 500, description = "DB error")
    ),
    tag = "Admin"
))]
pub async fn save_working_hours_handler(
    State(state): State<Arc<AdminState>>,
    payload: Result<Json<WorkingHours>, JsonRejection>,
) -> Result<Json<WorkingHours>, AppError> {
    let Json(hours) =
        payload.map_err(|rejection| validation_error(format!("Invalid working hours: {}", rejection.body_text())))?;
    check_working_hours(&hours)?;

    state.working_hours.save(hours.clone()).await?;
    info!("Working hours updated");
    Ok(Json(hours))
}

/// Known customers with their completed-appointment counts.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/users",
    params(("X-Admin-Secret" = String, Header, description = "Admin shared secret")),
    responses(
        (status = 200, description = "User profiles", body = [AdminUserView]),
        (status = 401, description = "Missing or invalid admin secret"),
        (status = 500, description = "DB error")
    ),
    tag = "Admin"
))]
pub async fn list_users_handler(
    State(state): State<Arc<AdminState>>,
) -> Result<Json<Vec<AdminUserView>>, AppError> {
    let users = state.users.list().await?;
    let appointments = state.appointments.list_all().await?;
    Ok(Json(users_with_counts(users, &appointments)))
}
