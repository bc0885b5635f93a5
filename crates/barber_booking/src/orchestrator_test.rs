#[cfg(test)]
mod tests {
    use crate::availability::has_active_appointment;
    use crate::orchestrator::*;
    use barber_common::models::{DayHours, Identity, NewAppointment, WorkingHours};
    use barber_common::{
        AppError, AppointmentRepository, BoxFuture, ConflictKind, FixedClock, StoreError,
        WorkingHoursRepository,
    };
    use barber_db::{InMemoryAppointmentRepository, InMemoryWorkingHoursRepository};
    use chrono::{Duration, NaiveDate, NaiveTime};
    use std::sync::Arc;

    fn today() -> NaiveDate {
        // a Sunday
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn service_at(
        time: NaiveTime,
    ) -> (BookingService, Arc<InMemoryAppointmentRepository>) {
        let rules = BookingRules::default();
        let clock = FixedClock::at_local(rules.time_zone, today(), time);
        let appointments = Arc::new(InMemoryAppointmentRepository::new());
        let service = BookingService::new(
            appointments.clone(),
            Arc::new(InMemoryWorkingHoursRepository::new()),
            Arc::new(clock),
            rules,
        );
        (service, appointments)
    }

    fn service() -> (BookingService, Arc<InMemoryAppointmentRepository>) {
        service_at(NaiveTime::from_hms_opt(8, 0, 0).unwrap())
    }

    fn request(name: &str, email: Option<&str>, date: NaiveDate, time: &str) -> BookingRequest {
        BookingRequest {
            name: Some(name.to_string()),
            phone: Some("0501234567".to_string()),
            date: Some(date.format("%Y-%m-%d").to_string()),
            time: Some(time.to_string()),
            email: email.map(str::to_string),
            uid: None,
        }
    }

    fn tomorrow() -> NaiveDate {
        today() + Duration::days(1)
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let (service, appointments) = service();
        let dana = Identity::email("d@x.com");

        // first booking is confirmed
        let first = service
            .book(request("Dana", Some("d@x.com"), tomorrow(), "10:00"))
            .await
            .unwrap();
        assert!(first.is_active());
        assert_eq!(first.identity_key, "email:d@x.com");

        // same e-mail, other slot
        let err = service
            .book(request("Dana", Some("d@x.com"), tomorrow(), "11:00"))
            .await
            .unwrap_err();
        assert_eq!(err.stage, BookingStage::Checking);
        assert_eq!(err.reason, RejectReason::Conflict(ConflictKind::AlreadyBooked));

        // other e-mail, same slot
        let err = service
            .book(request("Noa", Some("n@x.com"), tomorrow(), "10:00"))
            .await
            .unwrap_err();
        assert_eq!(err.reason, RejectReason::Conflict(ConflictKind::SlotTaken));

        // admin completes the first appointment
        appointments
            .mark_done(first.id, service.clock().now())
            .await
            .unwrap();
        let active = appointments.list_active().await.unwrap();
        assert!(!has_active_appointment(&dana, &active));

        let again = service
            .book(request("Dana", Some("d@x.com"), tomorrow(), "12:00"))
            .await
            .unwrap();
        assert_ne!(again.id, first.id);
    }

    #[tokio::test]
    async fn test_missing_fields_are_reported_together() {
        let (service, _) = service();
        let err = service
            .book(BookingRequest {
                name: Some("  ".to_string()),
                date: Some("2025-06-02".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.stage, BookingStage::Validating);
        assert_eq!(
            err.reason,
            RejectReason::MissingFields(vec!["name", "phone", "time"])
        );
        assert!(matches!(AppError::from(err), AppError::ValidationError(msg) if msg == "Missing fields"));
    }

    #[tokio::test]
    async fn test_phone_optional_when_configured() {
        let (base, _) = service();
        let service = BookingService::new(
            base.appointments().clone(),
            base.working_hours().clone(),
            base.clock().clone(),
            BookingRules {
                require_phone: false,
                ..BookingRules::default()
            },
        );
        let mut req = request("Dana", None, tomorrow(), "10:00");
        req.phone = None;

        let booked = service.book(req).await.unwrap();
        assert_eq!(booked.phone, None);
        assert_eq!(booked.identity_key, "name:Dana");
    }

    #[tokio::test]
    async fn test_malformed_date_and_time() {
        let (service, _) = service();

        let mut req = request("Dana", None, tomorrow(), "10:00");
        req.date = Some("02/06/2025".to_string());
        let err = service.book(req).await.unwrap_err();
        assert!(matches!(err.reason, RejectReason::InvalidField { field: "date", .. }));

        let err = service
            .book(request("Dana", None, tomorrow(), "ten"))
            .await
            .unwrap_err();
        assert!(matches!(err.reason, RejectReason::InvalidField { field: "time", .. }));
    }

    #[tokio::test]
    async fn test_booking_window() {
        let (service, _) = service();

        let err = service
            .book(request("Dana", None, today() - Duration::days(1), "10:00"))
            .await
            .unwrap_err();
        assert!(matches!(err.reason, RejectReason::OutsideWindow { .. }));

        // 2025-06-15 is today + 14, one past the last bookable day
        let err = service
            .book(request("Dana", None, today() + Duration::days(14), "10:00"))
            .await
            .unwrap_err();
        assert!(matches!(err.reason, RejectReason::OutsideWindow { .. }));

        // today + 13 is a Saturday (closed), today + 12 a Friday
        service
            .book(request("Dana", None, today() + Duration::days(12), "10:00"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_time_must_be_a_generated_slot() {
        let (service, _) = service();

        for time in ["10:30", "19:00", "08:00"] {
            let err = service
                .book(request("Dana", None, tomorrow(), time))
                .await
                .unwrap_err();
            assert!(matches!(err.reason, RejectReason::NotASlot { .. }), "{}", time);
        }

        // Saturday is closed
        let saturday = today() + Duration::days(6);
        let err = service
            .book(request("Dana", None, saturday, "10:00"))
            .await
            .unwrap_err();
        assert!(matches!(err.reason, RejectReason::NotASlot { .. }));
    }

    #[tokio::test]
    async fn test_past_slot_today_is_rejected() {
        let (service, _) = service_at(NaiveTime::from_hms_opt(12, 30, 0).unwrap());

        let err = service
            .book(request("Dana", None, today(), "12:00"))
            .await
            .unwrap_err();
        assert_eq!(err.stage, BookingStage::Checking);
        assert!(matches!(err.reason, RejectReason::SlotInPast { .. }));

        service
            .book(request("Dana", None, today(), "13:00"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_timestamps_come_from_the_service_clock() {
        let (service, appointments) = service();
        let booked_at = service.clock().now();

        let booked = service
            .book(request("Dana", Some("d@x.com"), tomorrow(), "10:00"))
            .await
            .unwrap();
        assert_eq!(booked.created_at, booked_at);

        let done = appointments
            .mark_done(booked.id, service.clock().now())
            .await
            .unwrap();
        let completed_at = done.completed_at.unwrap();
        assert!(completed_at >= done.created_at);
    }

    #[tokio::test]
    async fn test_uid_is_stored_with_email_identity() {
        let (service, _) = service();
        let mut req = request("Dana", Some("D@x.com"), tomorrow(), "10:00");
        req.uid = Some("u-42".to_string());

        let booked = service.book(req).await.unwrap();
        assert_eq!(booked.identity_key, "email:d@x.com");
        assert_eq!(booked.email.as_deref(), Some("d@x.com"));
        assert_eq!(booked.uid.as_deref(), Some("u-42"));
    }

    #[tokio::test]
    async fn test_saved_working_hours_are_used() {
        let rules = BookingRules::default();
        let mut hours = WorkingHours::default();
        hours.monday = DayHours::open(
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        );
        let service = BookingService::new(
            Arc::new(InMemoryAppointmentRepository::new()),
            Arc::new(InMemoryWorkingHoursRepository::with_hours(hours)),
            Arc::new(FixedClock::at_local(rules.time_zone, today(), NaiveTime::from_hms_opt(8, 0, 0).unwrap())),
            rules,
        );

        assert!(service.book(request("Dana", None, tomorrow(), "10:00")).await.is_err());
        service
            .book(request("Dana", None, tomorrow(), "15:00"))
            .await
            .unwrap();
    }

    /// A store whose conditional write always loses, as if another booking
    /// committed between the check and the insert.
    struct RacingStore(InMemoryAppointmentRepository);

    impl AppointmentRepository for RacingStore {
        fn create(&self, _appointment: NewAppointment) -> BoxFuture<'_, barber_common::models::Appointment, StoreError> {
            Box::pin(async { Err(StoreError::Conflict(ConflictKind::SlotTaken)) })
        }
        fn get(&self, id: i64) -> BoxFuture<'_, Option<barber_common::models::Appointment>, StoreError> {
            self.0.get(id)
        }
        fn list_all(&self) -> BoxFuture<'_, Vec<barber_common::models::Appointment>, StoreError> {
            self.0.list_all()
        }
        fn list_active(&self) -> BoxFuture<'_, Vec<barber_common::models::Appointment>, StoreError> {
            self.0.list_active()
        }
        fn list_active_on(&self, date: NaiveDate) -> BoxFuture<'_, Vec<barber_common::models::Appointment>, StoreError> {
            self.0.list_active_on(date)
        }
        fn list_by_identity(&self, identity: &Identity) -> BoxFuture<'_, Vec<barber_common::models::Appointment>, StoreError> {
            self.0.list_by_identity(identity)
        }
        fn list_completed_since(&self, since: chrono::DateTime<chrono::Utc>) -> BoxFuture<'_, Vec<barber_common::models::Appointment>, StoreError> {
            self.0.list_completed_since(since)
        }
        fn mark_done(&self, id: i64, at: chrono::DateTime<chrono::Utc>) -> BoxFuture<'_, barber_common::models::Appointment, StoreError> {
            self.0.mark_done(id, at)
        }
        fn delete(&self, id: i64) -> BoxFuture<'_, (), StoreError> {
            self.0.delete(id)
        }
        fn ping(&self) -> BoxFuture<'_, (), StoreError> {
            self.0.ping()
        }
    }

    /// Working hours store that is down.
    struct DownStore;

    impl WorkingHoursRepository for DownStore {
        fn get_or_init(&self) -> BoxFuture<'_, WorkingHours, StoreError> {
            Box::pin(async { Err(StoreError::Unavailable("connection refused".to_string())) })
        }
        fn save(&self, _hours: WorkingHours) -> BoxFuture<'_, (), StoreError> {
            Box::pin(async { Err(StoreError::Unavailable("connection refused".to_string())) })
        }
    }

    #[tokio::test]
    async fn test_lost_race_is_a_conflict() {
        let rules = BookingRules::default();
        let clock = FixedClock::at_local(rules.time_zone, today(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        let service = BookingService::new(
            Arc::new(RacingStore(InMemoryAppointmentRepository::new())),
            Arc::new(InMemoryWorkingHoursRepository::new()),
            Arc::new(clock),
            rules,
        );

        let err = service
            .book(request("Dana", Some("d@x.com"), tomorrow(), "10:00"))
            .await
            .unwrap_err();
        assert_eq!(err.stage, BookingStage::Persisting);
        assert_eq!(err.reason, RejectReason::Conflict(ConflictKind::SlotTaken));
    }

    #[tokio::test]
    async fn test_store_failure_is_a_persistence_error() {
        let rules = BookingRules::default();
        let clock = FixedClock::at_local(rules.time_zone, today(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        let service = BookingService::new(
            Arc::new(InMemoryAppointmentRepository::new()),
            Arc::new(DownStore),
            Arc::new(clock),
            rules,
        );

        let err = service
            .book(request("Dana", Some("d@x.com"), tomorrow(), "10:00"))
            .await
            .unwrap_err();
        assert!(matches!(err.reason, RejectReason::Store(StoreError::Unavailable(_))));
        assert!(matches!(AppError::from(err), AppError::PersistenceError(_)));
    }

    #[test]
    fn test_rules_from_config() {
        let config = barber_config::BookingConfig::default();
        let rules = BookingRules::from_config(&config).unwrap();
        assert_eq!(rules.window(today()), (today(), today() + Duration::days(13)));

        let bad = barber_config::BookingConfig {
            time_zone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(matches!(BookingRules::from_config(&bad), Err(AppError::ConfigError(_))));
    }
}
