// --- File: crates/barber_booking/src/availability.rs ---
//! Pure availability predicates over a snapshot of appointments.
//!
//! Nothing here touches a store; callers read the appointments first and
//! pass them in.

use crate::slots::generate_slots;
use barber_common::models::{Appointment, Identity, WorkingHours};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// A slot can be booked when it is not in the past and no active appointment
/// holds exactly that date and time.
///
/// `now` is the local wall time of the shop.
pub fn is_slot_available(
    date: NaiveDate,
    time: NaiveTime,
    existing: &[Appointment],
    now: NaiveDateTime,
) -> bool {
    !is_in_past(date, time, now) && !is_slot_taken(date, time, existing)
}

pub fn is_in_past(date: NaiveDate, time: NaiveTime, now: NaiveDateTime) -> bool {
    date.and_time(time) < now
}

pub fn is_slot_taken(date: NaiveDate, time: NaiveTime, existing: &[Appointment]) -> bool {
    existing.iter().any(|a| a.occupies(date, time))
}

/// True when `identity` already holds an appointment that is not done.
pub fn has_active_appointment(identity: &Identity, existing: &[Appointment]) -> bool {
    let key = identity.key();
    existing
        .iter()
        .any(|a| a.is_active() && a.identity_key == key)
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotAvailability {
    #[serde(with = "barber_common::models::hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "10:00"))]
    pub time: NaiveTime,
    pub available: bool,
}

/// Every generated slot of `date` with its availability.
pub fn available_slots(
    date: NaiveDate,
    working_hours: &WorkingHours,
    existing: &[Appointment],
    now: NaiveDateTime,
) -> Vec<SlotAvailability> {
    generate_slots(date, working_hours)
        .into_iter()
        .map(|time| SlotAvailability {
            time,
            available: is_slot_available(date, time, existing, now),
        })
        .collect()
}
