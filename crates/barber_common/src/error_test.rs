use crate::error::*;
use crate::services::{Clock, FixedClock, StoreError};
use axum::{body::to_bytes, response::IntoResponse};
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

async fn body_of(err: AppError) -> (u16, Value) {
    let response = err.into_response();
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_status_codes() {
    assert_eq!(validation_error("x").status_code(), 400);
    assert_eq!(AppError::ConflictError(ConflictKind::SlotTaken).status_code(), 409);
    assert_eq!(AppError::PersistenceError("down".into()).status_code(), 500);
    assert_eq!(AppError::NotFoundError("x".into()).status_code(), 404);
    assert_eq!(AppError::AuthError("x".into()).status_code(), 401);
    assert_eq!(AppError::InternalError("x".into()).status_code(), 500);
}

#[test]
fn test_store_errors_map_to_taxonomy() {
    assert!(matches!(
        AppError::from(StoreError::Conflict(ConflictKind::AlreadyBooked)),
        AppError::ConflictError(ConflictKind::AlreadyBooked)
    ));
    assert!(matches!(
        AppError::from(StoreError::NotFound(3)),
        AppError::NotFoundError(_)
    ));
    assert!(matches!(
        AppError::from(StoreError::Unavailable("io".into())),
        AppError::PersistenceError(_)
    ));
    assert!(matches!(
        AppError::from(StoreError::Malformed("bad json".into())),
        AppError::PersistenceError(_)
    ));
}

#[tokio::test]
async fn test_response_bodies() {
    let (status, body) = body_of(validation_error("Missing fields")).await;
    assert_eq!(status, 400);
    assert_eq!(body, serde_json::json!({ "error": "Missing fields" }));

    let (status, body) = body_of(AppError::ConflictError(ConflictKind::SlotTaken)).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "Slot already booked");

    let (_, body) = body_of(AppError::ConflictError(ConflictKind::AlreadyBooked)).await;
    assert_eq!(body["error"], "Already booked");
}

#[tokio::test]
async fn test_persistence_detail_is_not_leaked() {
    let (status, body) = body_of(AppError::PersistenceError("disk I/O error at /var/db".into())).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "DB error");
}

#[test]
fn test_fixed_clock_local_time() {
    let tz = chrono_tz::Asia::Jerusalem;
    let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let time = NaiveTime::from_hms_opt(8, 30, 0).unwrap();

    let clock = FixedClock::at_local(tz, date, time);

    assert_eq!(clock.local_now(tz), (date, time));
    // UTC+2 in winter
    assert_eq!(clock.now().format("%H:%M").to_string(), "06:30");
    assert_eq!(clock.today(tz), date);
}
