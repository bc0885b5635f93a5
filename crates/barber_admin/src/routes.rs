// --- File: crates/barber_admin/src/routes.rs ---

use crate::auth::{admin_auth_middleware, AdminAuthState};
use crate::handlers::{
    completed_handler, delete_appointment_handler, get_working_hours_handler,
    list_active_handler, list_users_handler, mark_done_handler, save_working_hours_handler,
    AdminState,
};
use axum::{
    middleware,
    routing::{delete, get, patch},
    Router,
};
use barber_config::AppConfig;
use std::sync::Arc;
use tracing::warn;

/// Creates a router containing all admin routes, guarded by the admin secret.
pub fn routes(config: &AppConfig, state: Arc<AdminState>) -> Router {
    let auth_state = Arc::new(AdminAuthState::from_config(config));
    if auth_state.secret.is_none() {
        warn!("Admin routes mounted without a shared secret; they will answer 500");
    }

    Router::new()
        .route("/admin/appointments", get(list_active_handler))
        .route("/admin/appointments/completed", get(completed_handler))
        .route("/admin/appointments/{id}", delete(delete_appointment_handler))
        .route("/admin/appointments/{id}/done", patch(mark_done_handler))
        .route(
            "/admin/working-hours",
            get(get_working_hours_handler).put(save_working_hours_handler),
        )
        .route("/admin/users", get(list_users_handler))
        .layer(middleware::from_fn_with_state(auth_state, admin_auth_middleware))
        .with_state(state)
}
