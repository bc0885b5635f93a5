//! Test fixtures for the booking API tests
//!
//! Builds the customer router on in-memory stores with the clock pinned to
//! Sunday 2025-06-01, 08:00 in Jerusalem.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use barber_booking::handlers::BookingState;
use barber_booking::routes;
use barber_common::models::WorkingHours;
use barber_common::{AppointmentRepository, FixedClock};
use barber_config::AppConfig;
use barber_db::{
    InMemoryAppointmentRepository, InMemoryUserProfileRepository, InMemoryWorkingHoursRepository,
};
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

pub fn tomorrow() -> &'static str {
    "2025-06-02"
}

pub struct TestApp {
    pub router: Router,
    pub appointments: Arc<InMemoryAppointmentRepository>,
}

pub fn app() -> TestApp {
    app_with(AppConfig::default(), WorkingHours::default())
}

pub fn app_with(config: AppConfig, hours: WorkingHours) -> TestApp {
    let appointments = Arc::new(InMemoryAppointmentRepository::new());
    let clock = FixedClock::at_local(
        chrono_tz::Asia::Jerusalem,
        today(),
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    );
    let state = BookingState::new(
        &config,
        appointments.clone(),
        Arc::new(InMemoryWorkingHoursRepository::with_hours(hours)),
        Arc::new(InMemoryUserProfileRepository::new()),
        Arc::new(clock),
    )
    .expect("default booking config is valid");

    TestApp {
        router: routes(Arc::new(state)),
        appointments,
    }
}

pub fn booking_body(name: &str, email: &str, date: &str, time: &str) -> Value {
    serde_json::json!({
        "name": name,
        "phone": "0501234567",
        "date": date,
        "time": time,
        "email": email,
    })
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

pub async fn active_count(app: &TestApp) -> usize {
    app.appointments.list_active().await.unwrap().len()
}
