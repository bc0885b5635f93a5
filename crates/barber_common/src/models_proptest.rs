use crate::models::{DayHours, Identity, WorkingHours};
use chrono::NaiveTime;
use proptest::prelude::*;

fn time(minutes_of_day: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minutes_of_day / 60, minutes_of_day % 60, 0).unwrap()
}

proptest! {
    // Case and surrounding whitespace never split one customer into two
    #[test]
    fn test_email_identity_ignores_case_and_padding(
        local in "[a-z0-9]{1,12}",
        domain in "[a-z]{1,8}\\.[a-z]{2,3}",
        pad in " {0,3}",
    ) {
        let plain = format!("{}@{}", local, domain);
        let noisy = format!("{}{}{}", pad, plain.to_uppercase(), pad);

        prop_assert_eq!(Identity::email(&noisy).key(), Identity::email(&plain).key());
        prop_assert_eq!(
            Identity::resolve(Some(&noisy), Some("uid-1"), "Dana"),
            Some(Identity::email(&plain))
        );
    }

    // An open day validates exactly when from <= to
    #[test]
    fn test_open_day_validation(from_min in 0u32..1440, to_min in 0u32..1440) {
        let mut hours = WorkingHours::default();
        hours.wednesday = DayHours::open(time(from_min), time(to_min));

        prop_assert_eq!(hours.validate().is_ok(), from_min <= to_min);
    }
}
