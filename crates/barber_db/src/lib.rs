//! Storage for the barbershop booking service
//!
//! Two interchangeable backends implement the repository traits from
//! `barber_common::services`:
//!
//! - SQL repositories over an SQLx `Any` pool (SQLite by default), where the
//!   one-active-appointment rules are partial unique indexes.
//! - In-memory repositories for tests and for running without a database,
//!   where the same rules are checked under a single lock.
//!
//! # Example
//!
//! ```rust,no_run
//! use barber_config::AppConfig;
//! use barber_db::Stores;
//!
//! async fn setup() -> Result<Stores, barber_db::error::DbError> {
//!     let config = AppConfig::default();
//!     Stores::from_config(&config).await
//! }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod memory;
pub mod repositories;


// Register the SQLite driver when the crate is loaded
#[cfg(feature = "sqlite")]
mod sqlite_driver {
    #[allow(unused_imports)]
    use sqlx::sqlite::SqlitePoolOptions as _;
}

pub use client::DbClient;
pub use factory::Stores;
pub use memory::{InMemoryAppointmentRepository, InMemoryUserProfileRepository, InMemoryWorkingHoursRepository};
pub use repositories::{SqlAppointmentRepository, SqlUserProfileRepository, SqlWorkingHoursRepository};
