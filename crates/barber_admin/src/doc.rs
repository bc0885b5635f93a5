// --- File: crates/barber_admin/src/doc.rs ---

#![cfg(feature = "openapi")]

use utoipa::OpenApi;

use crate::logic::{AdminUserView, CompletedQuery};
use barber_common::models::{Appointment, AppointmentStatus, DayHours, UserProfile, WorkingHours};
use barber_common::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::list_active_handler,
        crate::handlers::mark_done_handler,
        crate::handlers::delete_appointment_handler,
        crate::handlers::completed_handler,
        crate::handlers::get_working_hours_handler,
        crate::handlers::save_working_hours_handler,
        crate::handlers::list_users_handler
    ),
    components(
        schemas(
            CompletedQuery,
            AdminUserView,
            Appointment,
            AppointmentStatus,
            WorkingHours,
            DayHours,
            UserProfile,
            ErrorBody
        )
    ),
    tags(
        (name = "Admin", description = "Appointment management and shop configuration (X-Admin-Secret)")
    )
)]
pub struct AdminApiDoc;
