use super::user_profile_sql::SqlUserProfileRepository;
use super::working_hours_sql::SqlWorkingHoursRepository;
use crate::factory::Stores;
use crate::DbClient;
use barber_common::models::{DayHours, UserProfile, WorkingHours};
use barber_common::{StoreError, UserProfileRepository, WorkingHoursRepository};
use barber_config::{AppConfig, DatabaseConfig};
use chrono::{NaiveTime, TimeZone, Utc};

async fn client() -> DbClient {
    DbClient::from_url("sqlite::memory:").await.unwrap()
}

#[tokio::test]
async fn test_default_hours_are_persisted_on_first_read() {
    let repo = SqlWorkingHoursRepository::new(client().await);
    repo.init_schema().await.unwrap();

    assert_eq!(repo.get_or_init().await.unwrap(), WorkingHours::default());
    assert_eq!(repo.get_or_init().await.unwrap(), WorkingHours::default());

    let mut hours = WorkingHours::default();
    hours.friday = DayHours::closed();
    hours.saturday = DayHours::open(
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
    );
    repo.save(hours.clone()).await.unwrap();

    assert_eq!(repo.get_or_init().await.unwrap(), hours);
}

#[tokio::test]
async fn test_malformed_hours_fail_fast() {
    let repo = SqlWorkingHoursRepository::new(client().await);
    repo.init_schema().await.unwrap();
    repo.get_or_init().await.unwrap();

    repo.overwrite_raw(r#"{"sunday": 5}"#).await.unwrap();

    assert!(matches!(
        repo.get_or_init().await.unwrap_err(),
        StoreError::Malformed(_)
    ));
}

#[tokio::test]
async fn test_stored_hours_are_validated_on_read() {
    let repo = SqlWorkingHoursRepository::new(client().await);
    repo.init_schema().await.unwrap();
    repo.get_or_init().await.unwrap();

    let mut value = serde_json::to_value(WorkingHours::default()).unwrap();
    value["monday"] = serde_json::json!({ "open": true, "from": "18:00", "to": "09:00" });
    repo.overwrite_raw(&value.to_string()).await.unwrap();

    assert!(matches!(
        repo.get_or_init().await.unwrap_err(),
        StoreError::Malformed(_)
    ));
}

#[tokio::test]
async fn test_user_without_name_or_email() {
    let repo = SqlUserProfileRepository::new(client().await);
    repo.init_schema().await.unwrap();
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();

    let stored = repo
        .upsert(UserProfile {
            uid: "u2".into(),
            display_name: None,
            email: None,
            created_at: at,
            last_sign_in_at: at,
        })
        .await
        .unwrap();

    assert_eq!(stored.display_name, None);
    assert_eq!(stored.email, None);
    assert_eq!(repo.list().await.unwrap(), vec![stored]);
}

#[tokio::test]
async fn test_user_upsert() {
    let repo = SqlUserProfileRepository::new(client().await);
    repo.init_schema().await.unwrap();
    let first = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap();

    repo.upsert(UserProfile {
        uid: "u1".into(),
        display_name: None,
        email: Some("d@x.com".into()),
        created_at: first,
        last_sign_in_at: first,
    })
    .await
    .unwrap();

    let updated = repo
        .upsert(UserProfile {
            uid: "u1".into(),
            display_name: Some("Dana".into()),
            email: Some("d@x.com".into()),
            created_at: second,
            last_sign_in_at: second,
        })
        .await
        .unwrap();

    assert_eq!(updated.created_at, first);
    assert_eq!(updated.last_sign_in_at, second);
    assert_eq!(updated.display_name.as_deref(), Some("Dana"));
    assert_eq!(repo.list().await.unwrap(), vec![updated]);
}

#[tokio::test]
async fn test_factory_selects_backend() {
    let memory = Stores::from_config(&AppConfig::default()).await.unwrap();
    memory.appointments.ping().await.unwrap();

    let config = AppConfig {
        database: Some(DatabaseConfig {
            url: "sqlite::memory:".to_string(),
        }),
        ..AppConfig::default()
    };
    let sql = Stores::from_config(&config).await.unwrap();
    sql.appointments.ping().await.unwrap();
    assert_eq!(sql.working_hours.get_or_init().await.unwrap(), WorkingHours::default());
}
