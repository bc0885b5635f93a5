// --- File: crates/barber_booking/src/slots.rs ---
use barber_common::models::{DayHours, WorkingHours};
use chrono::{NaiveDate, NaiveTime, Timelike};

/// Bookable times for `date` under the weekly schedule, ascending.
///
/// Slots are whole hours: the first one is `from` rounded up to the next
/// hour, the last one is the latest whole hour not after `to`. Closed days,
/// days without a range, and reversed ranges yield nothing.
pub fn generate_slots(date: NaiveDate, working_hours: &WorkingHours) -> Vec<NaiveTime> {
    slots_for_day(working_hours.for_date(date))
}

/// Same as [`generate_slots`] for a single weekday entry.
pub fn slots_for_day(day: &DayHours) -> Vec<NaiveTime> {
    let (from, to) = match (day.open, day.from, day.to) {
        (true, Some(from), Some(to)) if from <= to => (from, to),
        _ => return Vec::new(),
    };

    let first_hour = if from.minute() > 0 || from.second() > 0 || from.nanosecond() > 0 {
        from.hour() + 1
    } else {
        from.hour()
    };

    (first_hour..24)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .take_while(|slot| *slot <= to)
        .collect()
}

/// Whether `time` is one of the generated slots for `date`.
pub fn is_generated_slot(date: NaiveDate, time: NaiveTime, working_hours: &WorkingHours) -> bool {
    generate_slots(date, working_hours).contains(&time)
}
