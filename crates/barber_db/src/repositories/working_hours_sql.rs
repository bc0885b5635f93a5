//! Working hours kept as one JSON document in a key/value `settings` table

use crate::error::DbError;
use crate::DbClient;
use barber_common::models::WorkingHours;
use barber_common::{BoxFuture, StoreError, WorkingHoursRepository};
use sqlx::Row;
use tracing::{debug, error, info};

const WORKING_HOURS_KEY: &str = "working_hours";

#[derive(Debug, Clone)]
pub struct SqlWorkingHoursRepository {
    db_client: DbClient,
}

impl SqlWorkingHoursRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    pub async fn init_schema(&self) -> Result<(), DbError> {
        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS settings (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                )
                "#,
            )
            .await?;
        info!("Settings schema initialized successfully");
        Ok(())
    }

    async fn load(&self) -> Result<WorkingHours, DbError> {
        let default_json = serde_json::to_string(&WorkingHours::default())
            .map_err(|e| DbError::Malformed(e.to_string()))?;

        // First read persists the default so later reads see a stable record.
        let inserted = sqlx::query(
            "INSERT INTO settings (key, value) VALUES ($1, $2) ON CONFLICT (key) DO NOTHING",
        )
        .bind(WORKING_HOURS_KEY)
        .bind(default_json)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| DbError::QueryError(e.to_string()))?
        .rows_affected();
        if inserted > 0 {
            info!("Stored default working hours");
        }

        let row = sqlx::query("SELECT value FROM settings WHERE key = $1")
            .bind(WORKING_HOURS_KEY)
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        let raw: String = row
            .try_get("value")
            .map_err(|e| DbError::Malformed(e.to_string()))?;

        let hours: WorkingHours = serde_json::from_str(&raw).map_err(|e| {
            error!("Stored working hours are not valid: {}", e);
            DbError::Malformed(format!("working hours: {}", e))
        })?;
        hours.validate().map_err(|e| {
            error!("Stored working hours are not usable: {}", e);
            DbError::Malformed(format!("working hours: {}", e))
        })?;
        Ok(hours)
    }

    async fn store(&self, hours: WorkingHours) -> Result<(), DbError> {
        debug!("Saving working hours");
        let value = serde_json::to_string(&hours).map_err(|e| DbError::Malformed(e.to_string()))?;

        sqlx::query(
            "INSERT INTO settings (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        )
        .bind(WORKING_HOURS_KEY)
        .bind(value)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| {
            error!("Failed to save working hours: {}", e);
            DbError::QueryError(e.to_string())
        })?;
        Ok(())
    }

    /// Writes an arbitrary value under the working-hours key.
    #[cfg(test)]
    pub(crate) async fn overwrite_raw(&self, raw: &str) -> Result<(), DbError> {
        sqlx::query("UPDATE settings SET value = $1 WHERE key = $2")
            .bind(raw.to_string())
            .bind(WORKING_HOURS_KEY)
            .execute(self.db_client.pool())
            .await?;
        Ok(())
    }
}

impl WorkingHoursRepository for SqlWorkingHoursRepository {
    fn get_or_init(&self) -> BoxFuture<'_, WorkingHours, StoreError> {
        Box::pin(async move { Ok(self.load().await?) })
    }

    fn save(&self, hours: WorkingHours) -> BoxFuture<'_, (), StoreError> {
        Box::pin(async move { Ok(self.store(hours).await?) })
    }
}
