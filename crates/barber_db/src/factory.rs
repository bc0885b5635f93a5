//! Builds the set of repositories the application runs on.

use crate::client::DbClient;
use crate::error::DbError;
use crate::memory::{InMemoryAppointmentRepository, InMemoryUserProfileRepository, InMemoryWorkingHoursRepository};
use crate::repositories::{SqlAppointmentRepository, SqlUserProfileRepository, SqlWorkingHoursRepository};
use barber_common::{AppointmentRepository, UserProfileRepository, WorkingHoursRepository};
use barber_config::{AppConfig, DatabaseConfig};
use std::sync::Arc;
use tracing::{debug, info};

/// Every repository behind its trait object.
#[derive(Clone)]
pub struct Stores {
    pub appointments: Arc<dyn AppointmentRepository>,
    pub working_hours: Arc<dyn WorkingHoursRepository>,
    pub users: Arc<dyn UserProfileRepository>,
}

impl Stores {
    /// Picks the backend from `[database]`: absent or `memory` gives the
    /// in-memory stores, anything else is treated as an SQLx URL.
    pub async fn from_config(config: &AppConfig) -> Result<Self, DbError> {
        match config.database.as_ref() {
            Some(db_config) if !db_config.is_in_memory_store() => Self::sql(db_config).await,
            _ => {
                info!("No database configured, using in-memory stores");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Self {
        Self {
            appointments: Arc::new(InMemoryAppointmentRepository::new()),
            working_hours: Arc::new(InMemoryWorkingHoursRepository::new()),
            users: Arc::new(InMemoryUserProfileRepository::new()),
        }
    }

    /// Connects and creates the tables and indexes if they are missing.
    pub async fn sql(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        debug!("Creating SQL stores");
        let client = DbClient::from_config(db_config).await?;
        Self::from_client(client).await
    }

    pub async fn from_client(client: DbClient) -> Result<Self, DbError> {
        let appointments = SqlAppointmentRepository::new(client.clone());
        appointments.init_schema().await?;
        let working_hours = SqlWorkingHoursRepository::new(client.clone());
        working_hours.init_schema().await?;
        let users = SqlUserProfileRepository::new(client);
        users.init_schema().await?;

        info!("SQL stores ready");
        Ok(Self {
            appointments: Arc::new(appointments),
            working_hours: Arc::new(working_hours),
            users: Arc::new(users),
        })
    }
}
