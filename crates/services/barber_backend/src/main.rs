// File: services/barber_backend/src/main.rs
use barber_backend::{with_layers, AppState};
use barber_common::SystemClock;
use barber_config::{load_config, AppConfig};
use barber_db::Stores;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("🚨 Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    barber_common::init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("🚨 {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Arc<AppConfig>) -> Result<(), Box<dyn std::error::Error>> {
    let stores = Stores::from_config(&config).await?;
    let state = AppState::new(config.clone(), stores, Arc::new(SystemClock));

    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut app = state.api_router()?;

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use barber_admin::doc::AdminApiDoc;
        use barber_booking::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Barbershop Booking API",
                version = "0.1.0",
                description = "Slots, bookings, working hours and admin endpoints",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        if config.use_admin {
            openapi_doc.merge(AdminApiDoc::openapi());
        }
        info!("📖 Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    let app = with_layers(app);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
