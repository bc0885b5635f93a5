#[cfg(test)]
mod tests {
    use crate::slots::slots_for_day;
    use barber_common::models::DayHours;
    use chrono::{NaiveTime, Timelike};
    use proptest::prelude::*;

    fn time(minutes_of_day: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(minutes_of_day / 60, minutes_of_day % 60, 0).unwrap()
    }

    proptest! {
        // Every slot is a whole hour inside [from, to]
        #[test]
        fn test_slots_are_whole_hours_within_range(
            from_min in 0u32..1440,
            to_min in 0u32..1440,
        ) {
            let from = time(from_min);
            let to = time(to_min);
            let slots = slots_for_day(&DayHours::open(from, to));

            for slot in &slots {
                prop_assert_eq!(slot.minute(), 0);
                prop_assert!(*slot >= from);
                prop_assert!(*slot <= to);
            }
        }

        // Ascending, one hour apart, no duplicates
        #[test]
        fn test_slots_are_strictly_hourly(
            from_min in 0u32..1440,
            to_min in 0u32..1440,
        ) {
            let slots = slots_for_day(&DayHours::open(time(from_min), time(to_min)));

            for pair in slots.windows(2) {
                prop_assert_eq!(pair[1].hour(), pair[0].hour() + 1);
            }
        }

        // No whole hour inside the range is skipped
        #[test]
        fn test_slot_count_matches_range(
            from_min in 0u32..1440,
            to_min in 0u32..1440,
        ) {
            let slots = slots_for_day(&DayHours::open(time(from_min), time(to_min)));
            let expected = (0u32..24)
                .filter(|h| h * 60 >= from_min && h * 60 <= to_min)
                .count();

            prop_assert_eq!(slots.len(), expected);
        }

        // A closed day never has slots
        #[test]
        fn test_closed_days_are_empty(
            from_min in 0u32..1440,
            to_min in 0u32..1440,
        ) {
            let day = DayHours { open: false, from: Some(time(from_min)), to: Some(time(to_min)) };
            prop_assert!(slots_for_day(&day).is_empty());
        }
    }
}
