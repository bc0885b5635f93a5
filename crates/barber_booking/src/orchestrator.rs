// --- File: crates/barber_booking/src/orchestrator.rs ---
//! Booking orchestration.
//!
//! One attempt moves `Draft -> Validating -> Checking -> Persisting` and ends
//! in `Confirmed` or `Rejected`. There is no retry; a rejected attempt is
//! reported to the caller, who may submit again.

use crate::availability::{has_active_appointment, is_in_past, is_slot_taken};
use crate::slots::is_generated_slot;
use barber_common::models::{parse_time, Appointment, Identity, NewAppointment};
use barber_common::{AppError, AppointmentRepository, Clock, ConflictKind, StoreError, WorkingHoursRepository};
use barber_config::BookingConfig;
use chrono::{Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStage {
    Draft,
    Validating,
    Checking,
    Persisting,
    Confirmed,
    Rejected,
}

impl fmt::Display for BookingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingStage::Draft => "draft",
            BookingStage::Validating => "validating",
            BookingStage::Checking => "checking",
            BookingStage::Persisting => "persisting",
            BookingStage::Confirmed => "confirmed",
            BookingStage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Booking form as submitted. Every field is optional on the wire so that
/// absent fields can be reported together.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
    #[cfg_attr(feature = "openapi", schema(example = "Dana"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "0501234567"))]
    pub phone: Option<String>,
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-06-02"))]
    pub date: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "10:00"))]
    pub time: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "d@x.com"))]
    pub email: Option<String>,
    pub uid: Option<String>,
}

/// Why an attempt was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectReason {
    #[error("missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid {field}: {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("{date} is outside the booking window {first}..={last}")]
    OutsideWindow {
        date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },

    #[error("{time} is not a slot on {date}")]
    NotASlot { date: NaiveDate, time: NaiveTime },

    #[error("{date} {time} has already passed")]
    SlotInPast { date: NaiveDate, time: NaiveTime },

    #[error("{0}")]
    Conflict(ConflictKind),

    #[error("{0}")]
    Store(StoreError),
}

/// A rejected booking attempt and the stage it stopped in.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("booking rejected while {stage}: {reason}")]
pub struct BookingError {
    pub stage: BookingStage,
    pub reason: RejectReason,
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err.reason {
            RejectReason::MissingFields(_) => AppError::ValidationError("Missing fields".to_string()),
            RejectReason::InvalidField { field, message } => {
                AppError::ValidationError(format!("Invalid {}: {}", field, message))
            }
            RejectReason::OutsideWindow { .. } => {
                AppError::ValidationError("Date is outside the booking window".to_string())
            }
            RejectReason::NotASlot { .. } => {
                AppError::ValidationError("Time is not an available slot".to_string())
            }
            RejectReason::SlotInPast { .. } => {
                AppError::ValidationError("Time has already passed".to_string())
            }
            RejectReason::Conflict(kind) => AppError::ConflictError(kind),
            RejectReason::Store(store) => AppError::from(store),
        }
    }
}

/// Booking window and form rules, resolved from `[booking]`.
#[derive(Debug, Clone)]
pub struct BookingRules {
    pub time_zone: Tz,
    pub min_days_ahead: i64,
    pub max_days_ahead: i64,
    pub require_phone: bool,
}

impl BookingRules {
    pub fn from_config(config: &BookingConfig) -> Result<Self, AppError> {
        let time_zone = Tz::from_str(&config.time_zone).map_err(|_| {
            AppError::ConfigError(format!("Unknown booking time zone `{}`", config.time_zone))
        })?;
        if config.min_days_ahead < 0 || config.max_days_ahead < config.min_days_ahead {
            return Err(AppError::ConfigError(format!(
                "Invalid booking window {}..={} days",
                config.min_days_ahead, config.max_days_ahead
            )));
        }
        Ok(Self {
            time_zone,
            min_days_ahead: config.min_days_ahead,
            max_days_ahead: config.max_days_ahead,
            require_phone: config.require_phone,
        })
    }

    /// First and last bookable date, inclusive.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (
            today + Duration::days(self.min_days_ahead),
            today + Duration::days(self.max_days_ahead),
        )
    }
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            time_zone: chrono_tz::Asia::Jerusalem,
            min_days_ahead: 0,
            max_days_ahead: 13,
            require_phone: true,
        }
    }
}

/// Tracks one attempt through its stages.
struct Attempt {
    stage: BookingStage,
}

impl Attempt {
    fn new() -> Self {
        Self {
            stage: BookingStage::Draft,
        }
    }

    fn advance(&mut self, next: BookingStage) {
        debug!("Booking attempt {} -> {}", self.stage, next);
        self.stage = next;
    }

    fn reject(&self, reason: RejectReason) -> BookingError {
        match &reason {
            RejectReason::Store(err) => error!("Booking failed while {}: {}", self.stage, err),
            other => info!("Booking rejected while {}: {}", self.stage, other),
        }
        BookingError {
            stage: self.stage,
            reason,
        }
    }
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Composes working hours, slot generation, the availability predicates and
/// the appointment store into one booking operation.
pub struct BookingService {
    appointments: Arc<dyn AppointmentRepository>,
    working_hours: Arc<dyn WorkingHoursRepository>,
    clock: Arc<dyn Clock>,
    rules: BookingRules,
}

impl BookingService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        working_hours: Arc<dyn WorkingHoursRepository>,
        clock: Arc<dyn Clock>,
        rules: BookingRules,
    ) -> Self {
        Self {
            appointments,
            working_hours,
            clock,
            rules,
        }
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    pub fn appointments(&self) -> &Arc<dyn AppointmentRepository> {
        &self.appointments
    }

    pub fn working_hours(&self) -> &Arc<dyn WorkingHoursRepository> {
        &self.working_hours
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Today in the shop's time zone.
    pub fn today(&self) -> NaiveDate {
        self.clock.today(self.rules.time_zone)
    }

    /// Runs one booking attempt to `Confirmed` or `Rejected`.
    pub async fn book(&self, request: BookingRequest) -> Result<Appointment, BookingError> {
        let mut attempt = Attempt::new();
        attempt.advance(BookingStage::Validating);

        // --- Validating ---
        let name = required(&request.name);
        let phone = required(&request.phone);
        let raw_date = required(&request.date);
        let raw_time = required(&request.time);

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if self.rules.require_phone && phone.is_none() {
            missing.push("phone");
        }
        if raw_date.is_none() {
            missing.push("date");
        }
        if raw_time.is_none() {
            missing.push("time");
        }
        let (name, raw_date, raw_time) = match (name, raw_date, raw_time) {
            (Some(name), Some(date), Some(time)) if missing.is_empty() => (name, date, time),
            _ => return Err(attempt.reject(RejectReason::MissingFields(missing))),
        };

        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
            attempt.reject(RejectReason::InvalidField {
                field: "date",
                message: format!("`{}` is not YYYY-MM-DD", raw_date),
            })
        })?;
        let time = parse_time(raw_time).ok_or_else(|| {
            attempt.reject(RejectReason::InvalidField {
                field: "time",
                message: format!("`{}` is not HH:MM", raw_time),
            })
        })?;

        let (first, last) = self.rules.window(self.today());
        if date < first || date > last {
            return Err(attempt.reject(RejectReason::OutsideWindow { date, first, last }));
        }

        let hours = self
            .working_hours
            .get_or_init()
            .await
            .map_err(|e| attempt.reject(RejectReason::Store(e)))?;
        if !is_generated_slot(date, time, &hours) {
            return Err(attempt.reject(RejectReason::NotASlot { date, time }));
        }

        // name is non-empty here, so an identity always resolves
        let identity = Identity::resolve(request.email.as_deref(), request.uid.as_deref(), name)
            .unwrap_or_else(|| Identity::name(name));

        // --- Checking ---
        attempt.advance(BookingStage::Checking);
        let existing = self
            .appointments
            .list_active()
            .await
            .map_err(|e| attempt.reject(RejectReason::Store(e)))?;

        if has_active_appointment(&identity, &existing) {
            return Err(attempt.reject(RejectReason::Conflict(ConflictKind::AlreadyBooked)));
        }
        if is_slot_taken(date, time, &existing) {
            return Err(attempt.reject(RejectReason::Conflict(ConflictKind::SlotTaken)));
        }
        let (today, now) = self.clock.local_now(self.rules.time_zone);
        if is_in_past(date, time, today.and_time(now)) {
            return Err(attempt.reject(RejectReason::SlotInPast { date, time }));
        }

        // --- Persisting ---
        attempt.advance(BookingStage::Persisting);
        let draft = NewAppointment::new(name, phone, date, time, &identity, self.clock.now())
            .with_uid(request.uid.as_deref());
        let created = self.appointments.create(draft).await.map_err(|e| match e {
            // lost a race against a concurrent booking
            StoreError::Conflict(kind) => attempt.reject(RejectReason::Conflict(kind)),
            other => attempt.reject(RejectReason::Store(other)),
        })?;

        attempt.advance(BookingStage::Confirmed);
        info!(
            "Booked appointment {} on {} at {}",
            created.id, created.date, created.time
        );
        Ok(created)
    }
}
