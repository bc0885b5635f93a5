// --- File: crates/services/barber_backend/src/app_state.rs ---
use axum::{response::IntoResponse, Router};
use barber_admin::AdminState;
use barber_booking::BookingState;
use barber_common::{AppError, Clock};
use barber_config::AppConfig;
use barber_db::Stores;
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// Everything the routers share: configuration, stores and the clock.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub stores: Stores,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, stores: Stores, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            stores,
            clock,
        }
    }

    /// Routes under `/api`: the customer routes always, the admin routes when enabled.
    pub fn api_router(&self) -> Result<Router, AppError> {
        let booking_state = BookingState::new(
            &self.config,
            self.stores.appointments.clone(),
            self.stores.working_hours.clone(),
            self.stores.users.clone(),
            self.clock.clone(),
        )?;
        let mut router = barber_booking::routes(Arc::new(booking_state));

        if self.config.use_admin {
            info!("💡 Mounting admin routes under /api/admin");
            let admin_state = Arc::new(AdminState {
                appointments: self.stores.appointments.clone(),
                working_hours: self.stores.working_hours.clone(),
                users: self.stores.users.clone(),
                clock: self.clock.clone(),
            });
            router = router.merge(barber_admin::routes(&self.config, admin_state));
        }

        Ok(Router::new().nest("/api", router))
    }
}

/// Request tracing, CORS for the separately served front end, and a JSON 500
/// for handler panics.
pub fn with_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);
    AppError::InternalError(detail).into_response()
}
