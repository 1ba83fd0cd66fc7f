//! OAuth authorization code storage

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use esignbridge_core::AuthorizationCodeRepository as AuthorizationCodeRepositoryPort;
use esignbridge_domain::{OAuthCodeRecord, Result as DomainResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use super::api_log_repository::parse_timestamp;
use super::manager::{map_join_error, map_sql_error, DbManager};

pub struct SqliteAuthorizationCodeRepository {
    db: Arc<DbManager>,
}

impl SqliteAuthorizationCodeRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthorizationCodeRepositoryPort for SqliteAuthorizationCodeRepository {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<OAuthCodeRecord>> {
        let db = Arc::clone(&self.db);
        let email = email.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<OAuthCodeRecord>> {
            let conn = db.get_connection()?;
            query_by_email(&conn, &email).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn save_code(&self, email: &str, code: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let email = email.to_string();
        let code = code.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            upsert_code(&conn, &email, &code).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// ============================================================================
// SQL Operations (synchronous)
// ============================================================================

fn query_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<OAuthCodeRecord>> {
    conn.query_row(
        "SELECT id, email, code, created_at, updated_at FROM oauth_tokens WHERE email = ?1",
        params![email],
        map_code_row,
    )
    .optional()
}

fn upsert_code(conn: &Connection, email: &str, code: &str) -> rusqlite::Result<()> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    conn.execute(
        "INSERT INTO oauth_tokens (email, code, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT(email) DO UPDATE SET code = excluded.code, updated_at = excluded.updated_at",
        params![email, code, now],
    )?;
    Ok(())
}

fn map_code_row(row: &Row<'_>) -> rusqlite::Result<OAuthCodeRecord> {
    Ok(OAuthCodeRecord {
        id: row.get(0)?,
        email: row.get(1)?,
        code: row.get(2)?,
        created_at: parse_timestamp(row, 3)?,
        updated_at: parse_timestamp(row, 4)?,
    })
}
