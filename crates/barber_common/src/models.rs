// --- File: crates/barber_common/src/models.rs ---

// Records shared by the booking, admin and storage crates.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Formats a time of day as `HH:MM`.
pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde helpers for a time of day written as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).ok_or_else(|| D::Error::custom(format!("invalid time `{}`", raw)))
    }
}

/// Like [`hhmm`], but an empty string stands for a missing value.
pub mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_str(&super::format_time(t)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_time(s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid time `{}`", s))),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Active,
    Done,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Active => "active",
            AppointmentStatus::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(AppointmentStatus::Active),
            "done" => Some(AppointmentStatus::Done),
            _ => None,
        }
    }
}

/// Who holds an appointment.
///
/// Resolution order is e-mail, then user id, then name for anonymous bookings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Email(String),
    UserId(String),
    Name(String),
}

impl Identity {
    /// Builds an e-mail identity; the address is trimmed and lower-cased.
    pub fn email(value: &str) -> Self {
        Identity::Email(value.trim().to_lowercase())
    }

    pub fn user_id(value: &str) -> Self {
        Identity::UserId(value.trim().to_string())
    }

    pub fn name(value: &str) -> Self {
        Identity::Name(value.trim().to_string())
    }

    /// Picks the strongest identity available, or `None` when every field is blank.
    pub fn resolve(email: Option<&str>, uid: Option<&str>, name: &str) -> Option<Self> {
        if let Some(email) = present(email) {
            return Some(Identity::email(email));
        }
        if let Some(uid) = present(uid) {
            return Some(Identity::user_id(uid));
        }
        present(Some(name)).map(Identity::name)
    }

    /// Canonical string stored alongside each appointment.
    pub fn key(&self) -> String {
        match self {
            Identity::Email(v) => format!("email:{}", v),
            Identity::UserId(v) => format!("uid:{}", v),
            Identity::Name(v) => format!("name:{}", v),
        }
    }
}

/// Trimmed value, or `None` when blank.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A stored appointment.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2025-06-01"))]
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "10:00"))]
    pub time: NaiveTime,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    pub identity_key: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Appointment {
    pub fn is_active(&self) -> bool {
        self.status == AppointmentStatus::Active
    }

    /// Whether this appointment occupies the given slot.
    pub fn occupies(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.is_active() && self.date == date && self.time == time
    }
}

/// An appointment before the store has assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub name: String,
    pub phone: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub email: Option<String>,
    pub uid: Option<String>,
    pub identity_key: String,
    pub created_at: DateTime<Utc>,
}

impl NewAppointment {
    pub fn new(
        name: &str,
        phone: Option<&str>,
        date: NaiveDate,
        time: NaiveTime,
        identity: &Identity,
        created_at: DateTime<Utc>,
    ) -> Self {
        let (email, uid) = match identity {
            Identity::Email(v) => (Some(v.clone()), None),
            Identity::UserId(v) => (None, Some(v.clone())),
            Identity::Name(_) => (None, None),
        };
        Self {
            name: name.trim().to_string(),
            phone: present(phone).map(str::to_string),
            date,
            time,
            email,
            uid,
            identity_key: identity.key(),
            created_at,
        }
    }

    /// Keeps the caller's user id even when the identity resolved to an e-mail.
    pub fn with_uid(mut self, uid: Option<&str>) -> Self {
        if self.uid.is_none() {
            self.uid = present(uid).map(str::to_string);
        }
        self
    }

    /// Turns the draft into a stored record.
    pub fn into_appointment(self, id: i64) -> Appointment {
        Appointment {
            id,
            name: self.name,
            phone: self.phone,
            date: self.date,
            time: self.time,
            email: self.email,
            uid: self.uid,
            identity_key: self.identity_key,
            status: AppointmentStatus::Active,
            created_at: self.created_at,
            completed_at: None,
        }
    }
}

/// Opening hours for one weekday.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: bool,
    #[serde(with = "hhmm_opt", default)]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "09:00"))]
    pub from: Option<NaiveTime>,
    #[serde(with = "hhmm_opt", default)]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "18:00"))]
    pub to: Option<NaiveTime>,
}

impl DayHours {
    pub fn open(from: NaiveTime, to: NaiveTime) -> Self {
        Self {
            open: true,
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn closed() -> Self {
        Self {
            open: false,
            from: None,
            to: None,
        }
    }
}

/// The weekly schedule, one entry per weekday.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub sunday: DayHours,
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
}

impl Default for WorkingHours {
    /// Sunday to Thursday 09:00-18:00, Friday 09:00-14:00, Saturday closed.
    fn default() -> Self {
        let hm = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default();
        let full = DayHours::open(hm(9), hm(18));
        Self {
            sunday: full,
            monday: full,
            tuesday: full,
            wednesday: full,
            thursday: full,
            friday: DayHours::open(hm(9), hm(14)),
            saturday: DayHours::closed(),
        }
    }
}

impl WorkingHours {
    pub fn for_weekday(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Sun => &self.sunday,
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
        }
    }

    pub fn for_date(&self, date: NaiveDate) -> &DayHours {
        self.for_weekday(date.weekday())
    }

    fn days(&self) -> [(&'static str, &DayHours); 7] {
        [
            ("sunday", &self.sunday),
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
        ]
    }

    /// Checks that every open day has a usable range.
    pub fn validate(&self) -> Result<(), String> {
        for (name, day) in self.days() {
            if !day.open {
                continue;
            }
            match (day.from, day.to) {
                (Some(from), Some(to)) if from <= to => {}
                (Some(_), Some(_)) => {
                    return Err(format!("{}: opening time is after closing time", name))
                }
                _ => return Err(format!("{}: open day needs both from and to", name)),
            }
        }
        Ok(())
    }
}

/// A customer account as reported by the identity provider.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: DateTime<Utc>,
}
