// --- File: crates/barber_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    /// `sqlite:data/appointments.db`, `sqlite::memory:` or `memory` for the
    /// process-local store.
    pub url: String,
}

impl DatabaseConfig {
    pub fn is_in_memory_store(&self) -> bool {
        let url = self.url.trim();
        url.is_empty() || url.eq_ignore_ascii_case("memory")
    }
}

// --- Booking Rules ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    /// IANA zone the shop operates in; "today" and "now" are evaluated here.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// First bookable day relative to today (0 = today, 1 = tomorrow).
    #[serde(default)]
    pub min_days_ahead: i64,
    /// Last bookable day relative to today, inclusive.
    #[serde(default = "default_max_days_ahead")]
    pub max_days_ahead: i64,
    /// The REST booking endpoint rejects bookings without a phone number.
    #[serde(default = "default_true")]
    pub require_phone: bool,
}

fn default_time_zone() -> String {
    "Asia/Jerusalem".to_string()
}

fn default_max_days_ahead() -> i64 {
    13
}

fn default_true() -> bool {
    true
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            min_days_ahead: 0,
            max_days_ahead: default_max_days_ahead(),
            require_phone: true,
        }
    }
}

// --- Admin Config ---
// Shared secret is usually given as "secret_from_env" and read from ADMIN_SHARED_SECRET.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AdminConfig {
    pub shared_secret: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags ---
    #[serde(default = "default_true")]
    pub use_admin: bool,

    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub admin: Option<AdminConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            use_admin: true,
            database: None,
            booking: BookingConfig::default(),
            admin: None,
        }
    }
}

impl AppConfig {
    /// The configured admin secret, if one is set and non-empty.
    pub fn admin_secret(&self) -> Option<&str> {
        self.admin
            .as_ref()
            .and_then(|admin| admin.shared_secret.as_deref())
            .filter(|secret| !secret.is_empty())
    }
}
