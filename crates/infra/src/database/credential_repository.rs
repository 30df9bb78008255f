//! SQLite implementation of the `CredentialRepository` port.

use std::sync::Arc;

use async_trait::async_trait;
use calbridge_core::CredentialRepository;
use calbridge_domain::{CalBridgeError, CredentialRecord, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;
use tracing::{debug, instrument};

use super::manager::DbManager;
use crate::errors::{map_join_error, InfraError};

/// SQLite-backed credential store. One row per user.
pub struct SqliteCredentialRepository {
    db: Arc<DbManager>,
}

impl SqliteCredentialRepository {
    /// Create a repository over the shared pool.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialRepository for SqliteCredentialRepository {
    #[instrument(skip(self))]
    async fn get(&self, user_id: &str) -> Result<Option<CredentialRecord>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<Option<CredentialRecord>> {
            let conn = db.get_connection()?;
            let raw = conn
                .query_row(
                    "SELECT user_id, access_token, refresh_token, expiry_ts, updated_at
                     FROM credential_records WHERE user_id = ?1",
                    params![&user_id],
                    RawCredential::from_row,
                )
                .optional()
                .map_err(InfraError::from)?;

            debug!(user_id = %user_id, found = raw.is_some(), "loaded credential record");
            raw.map(RawCredential::into_record).transpose()
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, record), fields(user_id = %record.user_id))]
    async fn upsert(&self, record: &CredentialRecord) -> Result<()> {
        let db = Arc::clone(&self.db);
        let record = record.clone();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO credential_records (user_id, access_token, refresh_token, expiry_ts, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                    access_token = excluded.access_token,
                    refresh_token = excluded.refresh_token,
                    expiry_ts = excluded.expiry_ts,
                    updated_at = excluded.updated_at",
                params![
                    &record.user_id,
                    &record.access_token,
                    &record.refresh_token,
                    record.expiry.map(|e| e.timestamp_micros()),
                    record.updated_at.timestamp_micros(),
                ],
            )
            .map_err(InfraError::from)?;
            debug!(user_id = %record.user_id, "upserted credential record");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let removed = conn
                .execute("DELETE FROM credential_records WHERE user_id = ?1", params![&user_id])
                .map_err(InfraError::from)?;
            debug!(user_id = %user_id, removed, "deleted credential record");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

struct RawCredential {
    user_id: String,
    access_token: String,
    refresh_token: Option<String>,
    expiry_ts: Option<i64>,
    updated_at: i64,
}

impl RawCredential {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            access_token: row.get(1)?,
            refresh_token: row.get(2)?,
            expiry_ts: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn into_record(self) -> Result<CredentialRecord> {
        Ok(CredentialRecord {
            expiry: self.expiry_ts.map(from_micros).transpose()?,
            updated_at: from_micros(self.updated_at)?,
            user_id: self.user_id,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
        })
    }
}

fn from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| CalBridgeError::Store(format!("timestamp out of range: {micros}")))
}
