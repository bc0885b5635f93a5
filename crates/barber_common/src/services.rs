// --- File: crates/barber_common/src/services.rs ---
//! Storage and clock abstractions.
//!
//! Handlers and the booking orchestrator only see these traits, so the SQL
//! stores and the in-memory fakes are interchangeable.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

use crate::error::ConflictKind;
use crate::models::{Appointment, Identity, NewAppointment, UserProfile, WorkingHours};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Failures a repository can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The backing store could not be reached or the statement failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A conditional write lost against an existing active appointment.
    #[error("conflict: {0}")]
    Conflict(ConflictKind),

    #[error("appointment {0} not found")]
    NotFound(i64),

    /// A stored record could not be decoded.
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Appointment persistence.
///
/// `create` must refuse, atomically, a second active appointment for the same
/// `(date, time)` or the same identity key.
pub trait AppointmentRepository: Send + Sync {
    /// Stores a new active appointment and returns it with id and `created_at`.
    fn create(&self, appointment: NewAppointment) -> BoxFuture<'_, Appointment, StoreError>;

    fn get(&self, id: i64) -> BoxFuture<'_, Option<Appointment>, StoreError>;

    /// Every appointment, ordered by date then time.
    fn list_all(&self) -> BoxFuture<'_, Vec<Appointment>, StoreError>;

    /// Active appointments, ordered by date then time.
    fn list_active(&self) -> BoxFuture<'_, Vec<Appointment>, StoreError>;

    /// Active appointments on a single day.
    fn list_active_on(&self, date: NaiveDate) -> BoxFuture<'_, Vec<Appointment>, StoreError>;

    /// Every appointment, active or done, held by `identity`.
    fn list_by_identity(&self, identity: &Identity) -> BoxFuture<'_, Vec<Appointment>, StoreError>;

    /// Done appointments completed at or after `since`.
    fn list_completed_since(
        &self,
        since: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Appointment>, StoreError>;

    /// Moves an appointment out of the active set.
    ///
    /// Completing an already done appointment succeeds without touching
    /// `completed_at`. Unknown ids fail with `NotFound`.
    fn mark_done(&self, id: i64, at: DateTime<Utc>) -> BoxFuture<'_, Appointment, StoreError>;

    /// Removes an appointment permanently. Unknown ids fail with `NotFound`.
    fn delete(&self, id: i64) -> BoxFuture<'_, (), StoreError>;

    /// Cheap round trip used by the health endpoint.
    fn ping(&self) -> BoxFuture<'_, (), StoreError>;
}

/// The single working-hours record.
pub trait WorkingHoursRepository: Send + Sync {
    /// Returns the saved schedule, storing the default one first if nothing
    /// was ever saved.
    fn get_or_init(&self) -> BoxFuture<'_, WorkingHours, StoreError>;

    /// Replaces the whole schedule.
    fn save(&self, hours: WorkingHours) -> BoxFuture<'_, (), StoreError>;
}

/// Cache of identity-provider profiles.
pub trait UserProfileRepository: Send + Sync {
    /// Inserts the profile, or refreshes name, e-mail and last sign-in of an
    /// existing one while keeping its `created_at`.
    fn upsert(&self, profile: UserProfile) -> BoxFuture<'_, UserProfile, StoreError>;

    fn list(&self) -> BoxFuture<'_, Vec<UserProfile>, StoreError>;
}

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current date and time of day in the business time zone.
    fn local_now(&self, tz: Tz) -> (NaiveDate, NaiveTime) {
        let local = self.now().with_timezone(&tz).naive_local();
        (local.date(), local.time())
    }

    fn today(&self, tz: Tz) -> NaiveDate {
        self.local_now(tz).0
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pins the clock to a local wall time in `tz`.
    ///
    /// Ambiguous or skipped local times fall back to interpreting the value as UTC.
    pub fn at_local(tz: Tz, date: NaiveDate, time: NaiveTime) -> Self {
        let naive = date.and_time(time);
        let instant = tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive));
        FixedClock(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
