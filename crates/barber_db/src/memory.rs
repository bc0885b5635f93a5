//! In-memory repositories
//!
//! Used by tests and when no database is configured. Each repository keeps
//! its state behind one mutex, so the availability check and the insert in
//! `create` cannot interleave with another booking.

use barber_common::models::{Appointment, AppointmentStatus, Identity, NewAppointment, UserProfile, WorkingHours};
use barber_common::{AppointmentRepository, BoxFuture, ConflictKind, StoreError, UserProfileRepository, WorkingHoursRepository};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
}

fn sorted(mut items: Vec<Appointment>) -> Vec<Appointment> {
    items.sort_by(|a, b| (a.date, a.time, a.id).cmp(&(b.date, b.time, b.id)));
    items
}

#[derive(Debug, Default)]
struct AppointmentTable {
    next_id: i64,
    rows: BTreeMap<i64, Appointment>,
}

impl AppointmentTable {
    fn select(&self, predicate: impl Fn(&Appointment) -> bool) -> Vec<Appointment> {
        sorted(self.rows.values().filter(|a| predicate(a)).cloned().collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAppointmentRepository {
    table: Mutex<AppointmentTable>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, draft: NewAppointment) -> Result<Appointment, StoreError> {
        let mut table = lock(&self.table)?;

        let active = || table.rows.values().filter(|a| a.is_active());
        if active().any(|a| a.identity_key == draft.identity_key) {
            return Err(StoreError::Conflict(ConflictKind::AlreadyBooked));
        }
        if active().any(|a| a.date == draft.date && a.time == draft.time) {
            return Err(StoreError::Conflict(ConflictKind::SlotTaken));
        }

        table.next_id += 1;
        let appointment = draft.into_appointment(table.next_id);
        table.rows.insert(appointment.id, appointment.clone());
        info!("Appointment {} created", appointment.id);
        Ok(appointment)
    }

    fn complete(&self, id: i64, at: DateTime<Utc>) -> Result<Appointment, StoreError> {
        let mut table = lock(&self.table)?;
        let appointment = table.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if appointment.is_active() {
            appointment.status = AppointmentStatus::Done;
            appointment.completed_at = Some(at);
        } else {
            debug!("Appointment {} was not active", id);
        }
        Ok(appointment.clone())
    }

    fn remove(&self, id: i64) -> Result<(), StoreError> {
        let mut table = lock(&self.table)?;
        table.rows.remove(&id).ok_or(StoreError::NotFound(id))?;
        info!("Appointment {} deleted", id);
        Ok(())
    }

    fn query(&self, predicate: impl Fn(&Appointment) -> bool) -> Result<Vec<Appointment>, StoreError> {
        Ok(lock(&self.table)?.select(predicate))
    }
}

impl AppointmentRepository for InMemoryAppointmentRepository {
    fn create(&self, appointment: NewAppointment) -> BoxFuture<'_, Appointment, StoreError> {
        let result = self.insert(appointment);
        Box::pin(async move { result })
    }

    fn get(&self, id: i64) -> BoxFuture<'_, Option<Appointment>, StoreError> {
        let result = lock(&self.table).map(|table| table.rows.get(&id).cloned());
        Box::pin(async move { result })
    }

    fn list_all(&self) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        let result = self.query(|_| true);
        Box::pin(async move { result })
    }

    fn list_active(&self) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        let result = self.query(Appointment::is_active);
        Box::pin(async move { result })
    }

    fn list_active_on(&self, date: NaiveDate) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        let result = self.query(|a| a.is_active() && a.date == date);
        Box::pin(async move { result })
    }

    fn list_by_identity(&self, identity: &Identity) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        let key = identity.key();
        let result = self.query(|a| a.identity_key == key);
        Box::pin(async move { result })
    }

    fn list_completed_since(
        &self,
        since: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        let result = self.query(|a| {
            a.status == AppointmentStatus::Done && a.completed_at.is_some_and(|at| at >= since)
        });
        Box::pin(async move { result })
    }

    fn mark_done(&self, id: i64, at: DateTime<Utc>) -> BoxFuture<'_, Appointment, StoreError> {
        let result = self.complete(id, at);
        Box::pin(async move { result })
    }

    fn delete(&self, id: i64) -> BoxFuture<'_, (), StoreError> {
        let result = self.remove(id);
        Box::pin(async move { result })
    }

    fn ping(&self) -> BoxFuture<'_, (), StoreError> {
        let result = lock(&self.table).map(|_| ());
        Box::pin(async move { result })
    }
}

/// Holds `None` until the schedule is first read or saved.
#[derive(Debug, Default)]
pub struct InMemoryWorkingHoursRepository {
    hours: Mutex<Option<WorkingHours>>,
}

impl InMemoryWorkingHoursRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an already saved schedule.
    pub fn with_hours(hours: WorkingHours) -> Self {
        Self {
            hours: Mutex::new(Some(hours)),
        }
    }
}

impl WorkingHoursRepository for InMemoryWorkingHoursRepository {
    fn get_or_init(&self) -> BoxFuture<'_, WorkingHours, StoreError> {
        let result = lock(&self.hours).map(|mut slot| slot.get_or_insert_with(WorkingHours::default).clone());
        Box::pin(async move { result })
    }

    fn save(&self, hours: WorkingHours) -> BoxFuture<'_, (), StoreError> {
        let result = lock(&self.hours).map(|mut slot| {
            *slot = Some(hours);
        });
        Box::pin(async move { result })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserProfileRepository {
    users: Mutex<BTreeMap<String, UserProfile>>,
}

impl InMemoryUserProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserProfileRepository for InMemoryUserProfileRepository {
    fn upsert(&self, profile: UserProfile) -> BoxFuture<'_, UserProfile, StoreError> {
        let result = lock(&self.users).map(|mut users| {
            let stored = users
                .entry(profile.uid.clone())
                .and_modify(|existing| {
                    existing.display_name = profile.display_name.clone();
                    existing.email = profile.email.clone();
                    existing.last_sign_in_at = profile.last_sign_in_at;
                })
                .or_insert(profile);
            stored.clone()
        });
        Box::pin(async move { result })
    }

    fn list(&self) -> BoxFuture<'_, Vec<UserProfile>, StoreError> {
        let result = lock(&self.users).map(|users| {
            let mut list: Vec<UserProfile> = users.values().cloned().collect();
            list.sort_by(|a, b| (a.created_at, &a.uid).cmp(&(b.created_at, &b.uid)));
            list
        });
        Box::pin(async move { result })
    }
}
