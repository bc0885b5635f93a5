//! SQL implementation of the appointment repository

use super::{format_timestamp, nullable_text, parse_timestamp};
use crate::error::DbError;
use crate::DbClient;
use barber_common::models::{format_time, parse_time, Appointment, AppointmentStatus, Identity, NewAppointment};
use barber_common::{AppointmentRepository, BoxFuture, StoreError};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

const COLUMNS: &str = "id, name, COALESCE(phone, '') AS phone, date, time, \
     COALESCE(email, '') AS email, COALESCE(uid, '') AS uid, identity_key, status, \
     created_at, COALESCE(completed_at, '') AS completed_at";

/// Appointments table with the two one-active-appointment rules expressed as
/// partial unique indexes.
#[derive(Debug, Clone)]
pub struct SqlAppointmentRepository {
    db_client: DbClient,
}

impl SqlAppointmentRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    pub async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing appointment schema");

        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS appointments (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    phone TEXT,
                    date TEXT NOT NULL,
                    time TEXT NOT NULL,
                    email TEXT,
                    uid TEXT,
                    identity_key TEXT NOT NULL,
                    status TEXT NOT NULL DEFAULT 'active',
                    created_at TEXT NOT NULL,
                    completed_at TEXT
                )
                "#,
            )
            .await?;

        self.db_client
            .execute(
                "CREATE UNIQUE INDEX IF NOT EXISTS ux_appointments_active_slot \
                 ON appointments (date, time) WHERE status = 'active'",
            )
            .await?;

        self.db_client
            .execute(
                "CREATE UNIQUE INDEX IF NOT EXISTS ux_appointments_active_identity \
                 ON appointments (identity_key) WHERE status = 'active'",
            )
            .await?;

        info!("Appointment schema initialized successfully");
        Ok(())
    }

    fn from_row(row: &AnyRow) -> Result<Appointment, DbError> {
        let get_text = |column: &str| -> Result<String, DbError> {
            row.try_get::<String, _>(column)
                .map_err(|e| DbError::Malformed(format!("{}: {}", column, e)))
        };
        let get_opt = |column: &str| nullable_text(row, column);

        let raw_date = get_text("date")?;
        let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
            .map_err(|e| DbError::Malformed(format!("date `{}`: {}", raw_date, e)))?;
        let raw_time = get_text("time")?;
        let time = parse_time(&raw_time)
            .ok_or_else(|| DbError::Malformed(format!("time `{}`", raw_time)))?;
        let raw_status = get_text("status")?;
        let status = AppointmentStatus::parse(&raw_status)
            .ok_or_else(|| DbError::Malformed(format!("status `{}`", raw_status)))?;
        let completed_at = get_opt("completed_at")?
            .map(|raw| parse_timestamp(&raw))
            .transpose()?;

        Ok(Appointment {
            id: row
                .try_get::<i64, _>("id")
                .map_err(|e| DbError::Malformed(format!("id: {}", e)))?,
            name: get_text("name")?,
            phone: get_opt("phone")?,
            date,
            time,
            email: get_opt("email")?,
            uid: get_opt("uid")?,
            identity_key: get_text("identity_key")?,
            status,
            created_at: parse_timestamp(&get_text("created_at")?)?,
            completed_at,
        })
    }

    async fn fetch_where(&self, clause: &str, binds: &[String]) -> Result<Vec<Appointment>, DbError> {
        let query = format!("SELECT {} FROM appointments {} ORDER BY date, time, id", COLUMNS, clause);
        let mut statement = sqlx::query(&query);
        for value in binds {
            statement = statement.bind(value.clone());
        }

        let rows = statement
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to list appointments: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn insert(&self, draft: NewAppointment) -> Result<Appointment, DbError> {
        debug!("Inserting appointment for {} at {} {}", draft.identity_key, draft.date, draft.time);

        let query = format!(
            "INSERT INTO appointments (name, phone, date, time, email, uid, identity_key, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', $8) \
             RETURNING {}",
            COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(draft.name)
            .bind(draft.phone)
            .bind(draft.date.format("%Y-%m-%d").to_string())
            .bind(format_time(&draft.time))
            .bind(draft.email)
            .bind(draft.uid)
            .bind(draft.identity_key)
            .bind(format_timestamp(&draft.created_at))
            .fetch_one(self.db_client.pool())
            .await
            .map_err(DbError::from_write)?;

        let created = Self::from_row(&row)?;
        info!("Appointment {} created", created.id);
        Ok(created)
    }

    async fn find(&self, id: i64) -> Result<Option<Appointment>, DbError> {
        let query = format!("SELECT {} FROM appointments WHERE id = $1", COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn complete(&self, id: i64, at: DateTime<Utc>) -> Result<Appointment, StoreError> {
        // Only an active row changes; a done row keeps its completed_at.
        let updated = sqlx::query(
            "UPDATE appointments SET status = 'done', completed_at = $1 \
             WHERE id = $2 AND status = 'active'",
        )
        .bind(format_timestamp(&at))
        .bind(id)
        .execute(self.db_client.pool())
        .await
        .map_err(|e| DbError::QueryError(e.to_string()))?
        .rows_affected();

        if updated == 0 {
            debug!("Appointment {} was not active", id);
        }

        self.find(id).await?.ok_or(StoreError::NotFound(id))
    }

    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        let deleted = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!("Appointment {} deleted", id);
        Ok(())
    }
}

impl AppointmentRepository for SqlAppointmentRepository {
    fn create(&self, appointment: NewAppointment) -> BoxFuture<'_, Appointment, StoreError> {
        Box::pin(async move { Ok(self.insert(appointment).await?) })
    }

    fn get(&self, id: i64) -> BoxFuture<'_, Option<Appointment>, StoreError> {
        Box::pin(async move { Ok(self.find(id).await?) })
    }

    fn list_all(&self) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        Box::pin(async move { Ok(self.fetch_where("", &[]).await?) })
    }

    fn list_active(&self) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        Box::pin(async move { Ok(self.fetch_where("WHERE status = 'active'", &[]).await?) })
    }

    fn list_active_on(&self, date: NaiveDate) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        let date = date.format("%Y-%m-%d").to_string();
        Box::pin(async move {
            Ok(self
                .fetch_where("WHERE status = 'active' AND date = $1", &[date])
                .await?)
        })
    }

    fn list_by_identity(&self, identity: &Identity) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        let key = identity.key();
        Box::pin(async move { Ok(self.fetch_where("WHERE identity_key = $1", &[key]).await?) })
    }

    fn list_completed_since(
        &self,
        since: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        // RFC 3339 in UTC with fixed precision sorts lexically
        let since = format_timestamp(&since);
        Box::pin(async move {
            Ok(self
                .fetch_where("WHERE status = 'done' AND completed_at >= $1", &[since])
                .await?)
        })
    }

    fn mark_done(&self, id: i64, at: DateTime<Utc>) -> BoxFuture<'_, Appointment, StoreError> {
        Box::pin(self.complete(id, at))
    }

    fn delete(&self, id: i64) -> BoxFuture<'_, (), StoreError> {
        Box::pin(self.remove(id))
    }

    fn ping(&self) -> BoxFuture<'_, (), StoreError> {
        Box::pin(async move {
            if self.db_client.is_healthy().await {
                Ok(())
            } else {
                Err(StoreError::Unavailable("database did not answer".to_string()))
            }
        })
    }
}
