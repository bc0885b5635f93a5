//! SQL repositories
//!
//! Values are stored as TEXT and INTEGER only: the `Any` driver cannot decode
//! chrono types, so dates, times and timestamps are formatted on the way in
//! and parsed on the way out. It cannot decode a NULL column either, so
//! nullable columns are selected through `COALESCE(col, '')` and read back
//! with [`nullable_text`].

pub mod appointment_sql;
pub mod user_profile_sql;
pub mod working_hours_sql;

#[cfg(test)]
mod settings_sql_test;

pub use appointment_sql::SqlAppointmentRepository;
pub use user_profile_sql::SqlUserProfileRepository;
pub use working_hours_sql::SqlWorkingHoursRepository;

use crate::error::DbError;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::any::AnyRow;
use sqlx::Row;

/// Reads a column selected as `COALESCE(col, '')`; the empty string is `None`.
pub(crate) fn nullable_text(row: &AnyRow, column: &str) -> Result<Option<String>, DbError> {
    let raw: String = row
        .try_get(column)
        .map_err(|e| DbError::Malformed(format!("{}: {}", column, e)))?;
    Ok(Some(raw).filter(|v| !v.is_empty()))
}

pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::Malformed(format!("timestamp `{}`: {}", raw, e)))
}
