//! SQL implementation of the user profile cache

use super::{format_timestamp, nullable_text, parse_timestamp};
use crate::error::DbError;
use crate::DbClient;
use barber_common::models::UserProfile;
use barber_common::{BoxFuture, StoreError, UserProfileRepository};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, info};

const COLUMNS: &str = "uid, COALESCE(display_name, '') AS display_name, \
     COALESCE(email, '') AS email, created_at, last_sign_in_at";

#[derive(Debug, Clone)]
pub struct SqlUserProfileRepository {
    db_client: DbClient,
}

impl SqlUserProfileRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    pub async fn init_schema(&self) -> Result<(), DbError> {
        self.db_client
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    uid TEXT PRIMARY KEY,
                    display_name TEXT,
                    email TEXT,
                    created_at TEXT NOT NULL,
                    last_sign_in_at TEXT NOT NULL
                )
                "#,
            )
            .await?;
        info!("User schema initialized successfully");
        Ok(())
    }

    fn from_row(row: &AnyRow) -> Result<UserProfile, DbError> {
        let malformed = |e: sqlx::Error| DbError::Malformed(e.to_string());
        Ok(UserProfile {
            uid: row.try_get("uid").map_err(malformed)?,
            display_name: nullable_text(row, "display_name")?,
            email: nullable_text(row, "email")?,
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at").map_err(malformed)?)?,
            last_sign_in_at: parse_timestamp(
                &row.try_get::<String, _>("last_sign_in_at").map_err(malformed)?,
            )?,
        })
    }

    async fn upsert_row(&self, profile: UserProfile) -> Result<UserProfile, DbError> {
        debug!("Upserting user profile {}", profile.uid);

        let query = format!(
            "INSERT INTO users (uid, display_name, email, created_at, last_sign_in_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (uid) DO UPDATE SET \
                display_name = excluded.display_name, \
                email = excluded.email, \
                last_sign_in_at = excluded.last_sign_in_at \
             RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(profile.uid)
            .bind(profile.display_name)
            .bind(profile.email)
            .bind(format_timestamp(&profile.created_at))
            .bind(format_timestamp(&profile.last_sign_in_at))
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        Self::from_row(&row)
    }

    async fn list_rows(&self) -> Result<Vec<UserProfile>, DbError> {
        let query = format!("SELECT {} FROM users ORDER BY created_at, uid", COLUMNS);
        let rows = sqlx::query(&query)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        rows.iter().map(Self::from_row).collect()
    }
}

impl UserProfileRepository for SqlUserProfileRepository {
    fn upsert(&self, profile: UserProfile) -> BoxFuture<'_, UserProfile, StoreError> {
        Box::pin(async move { Ok(self.upsert_row(profile).await?) })
    }

    fn list(&self) -> BoxFuture<'_, Vec<UserProfile>, StoreError> {
        Box::pin(async move { Ok(self.list_rows().await?) })
    }
}
