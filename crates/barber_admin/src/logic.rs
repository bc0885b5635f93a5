// --- File: crates/barber_admin/src/logic.rs ---

use barber_common::models::{Appointment, AppointmentStatus, UserProfile, WorkingHours};
use barber_common::{validation_error, AppError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

pub const DEFAULT_REPORT_DAYS: i64 = 7;
pub const MAX_REPORT_DAYS: i64 = 366;

// --- Request/Response DTOs ---

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct CompletedQuery {
    /// Look-back window in days (default 7).
    pub days: Option<i64>,
}

/// A user profile together with how many of their appointments were completed.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AdminUserView {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub completed_count: usize,
}

// --- Logic ---

/// Start of the completed-appointments report window.
pub fn report_since(now: DateTime<Utc>, days: Option<i64>) -> Result<DateTime<Utc>, AppError> {
    let days = days.unwrap_or(DEFAULT_REPORT_DAYS);
    if !(1..=MAX_REPORT_DAYS).contains(&days) {
        return Err(validation_error(format!(
            "days must be between 1 and {}",
            MAX_REPORT_DAYS
        )));
    }
    Ok(now - Duration::days(days))
}

/// Most recently completed first.
pub fn sort_completed(mut completed: Vec<Appointment>) -> Vec<Appointment> {
    completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(b.id.cmp(&a.id)));
    completed
}

/// Rejects schedules with an open day lacking a valid range.
pub fn check_working_hours(hours: &WorkingHours) -> Result<(), AppError> {
    hours.validate().map_err(validation_error)
}

/// Pairs every profile with the number of done appointments booked under its e-mail.
pub fn users_with_counts(users: Vec<UserProfile>, appointments: &[Appointment]) -> Vec<AdminUserView> {
    let mut done_by_email: HashMap<&str, usize> = HashMap::new();
    for appointment in appointments {
        if appointment.status != AppointmentStatus::Done {
            continue;
        }
        if let Some(email) = appointment.email.as_deref() {
            *done_by_email.entry(email).or_default() += 1;
        }
    }

    users
        .into_iter()
        .map(|profile| {
            let completed_count = profile
                .email
                .as_deref()
                .map(|e| e.trim().to_lowercase())
                .and_then(|e| done_by_email.get(e.as_str()).copied())
                .unwrap_or(0);
            AdminUserView {
                profile,
                completed_count,
            }
        })
        .collect()
}
