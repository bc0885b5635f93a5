// --- File: crates/barber_admin/src/auth.rs ---

use axum::{
    body::Body as AxumBody,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use barber_common::AppError;
use barber_config::AppConfig;
use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub const ADMIN_AUTH_HEADER: &str = "X-Admin-Secret";

/// State of the admin auth middleware: the shared secret, when configured.
#[derive(Clone, Debug, Default)]
pub struct AdminAuthState {
    pub secret: Option<String>,
}

impl AdminAuthState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            secret: config.admin_secret().map(str::to_string),
        }
    }
}

/// Compares the provided header value with the expected secret in constant time.
pub fn secret_matches(expected: &str, provided: Option<&str>) -> bool {
    match provided {
        Some(value) => constant_time_eq(value.as_bytes(), expected.as_bytes()),
        None => false,
    }
}

/// Rejects admin requests without a matching `X-Admin-Secret` header.
///
/// Without a configured secret every admin request fails with 500 instead of
/// the routes being left open.
pub async fn admin_auth_middleware(
    State(auth_state): State<Arc<AdminAuthState>>,
    req: Request<AxumBody>,
    next: Next,
) -> Response {
    let Some(expected) = auth_state.secret.as_deref() else {
        error!("Admin shared secret not configured, refusing admin request");
        return AppError::ConfigError("admin auth not configured".to_string()).into_response();
    };

    let provided = req
        .headers()
        .get(ADMIN_AUTH_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided.is_none() {
        warn!("Admin request without '{}' header", ADMIN_AUTH_HEADER);
        return AppError::AuthError(format!("missing {} header", ADMIN_AUTH_HEADER)).into_response();
    }
    if !secret_matches(expected, provided) {
        warn!("Admin request with an invalid secret");
        return AppError::AuthError("invalid admin secret".to_string()).into_response();
    }

    debug!("Admin request authenticated");
    next.run(req).await
}
