//! API Log Repository implementation
//!
//! Audit trail of outbound signing-provider calls.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use esignbridge_core::ApiLogRepository as ApiLogRepositoryPort;
use esignbridge_domain::{ApiLog, NewApiLog, Result as DomainResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use tokio::task;

use super::manager::{map_join_error, map_sql_error, DbManager};

/// Maximum rows returned by an invoice search.
const INVOICE_SEARCH_LIMIT: i64 = 100;

const SELECT_COLUMNS: &str = "SELECT id, endpoint, method, request_body, response_body, status_code, duration_ms, email, created_at FROM api_logs";

/// SQLite-backed audit log
pub struct SqliteApiLogRepository {
    db: Arc<DbManager>,
}

impl SqliteApiLogRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApiLogRepositoryPort for SqliteApiLogRepository {
    async fn save(&self, log: &NewApiLog) -> DomainResult<i64> {
        let db = Arc::clone(&self.db);
        let log = log.clone();

        task::spawn_blocking(move || -> DomainResult<i64> {
            let conn = db.get_connection()?;
            insert_api_log(&conn, &log).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_invoice(&self, invoice: &str) -> DomainResult<Vec<ApiLog>> {
        let db = Arc::clone(&self.db);
        let invoice = invoice.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<ApiLog>> {
            let conn = db.get_connection()?;
            query_by_invoice(&conn, &invoice).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_all(&self, limit: usize) -> DomainResult<Vec<ApiLog>> {
        let db = Arc::clone(&self.db);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        task::spawn_blocking(move || -> DomainResult<Vec<ApiLog>> {
            let conn = db.get_connection()?;
            query_recent(&conn, limit).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// ============================================================================
// SQL Operations (synchronous)
// ============================================================================

fn insert_api_log(conn: &Connection, log: &NewApiLog) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO api_logs (endpoint, method, request_body, response_body, status_code,
                               duration_ms, email, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            &log.endpoint,
            &log.method,
            &log.request_body,
            &log.response_body,
            log.status_code,
            log.duration_ms,
            &log.email,
            log.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn query_by_invoice(conn: &Connection, invoice: &str) -> rusqlite::Result<Vec<ApiLog>> {
    let pattern = format!("%{}%", invoice);
    let sql = format!(
        "{SELECT_COLUMNS} WHERE endpoint LIKE ?1 OR request_body LIKE ?1 ORDER BY created_at DESC, id DESC LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![pattern, INVOICE_SEARCH_LIMIT], map_api_log_row)?;
    rows.collect()
}

fn query_recent(conn: &Connection, limit: i64) -> rusqlite::Result<Vec<ApiLog>> {
    let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT ?1");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![limit], map_api_log_row)?;
    rows.collect()
}

fn map_api_log_row(row: &Row<'_>) -> rusqlite::Result<ApiLog> {
    Ok(ApiLog {
        id: row.get(0)?,
        endpoint: row.get(1)?,
        method: row.get(2)?,
        request_body: row.get(3)?,
        response_body: row.get(4)?,
        status_code: row.get(5)?,
        duration_ms: row.get(6)?,
        email: row.get(7)?,
        created_at: parse_timestamp(row, 8)?,
    })
}

pub(crate) fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

// ============================================================================
// Tests
// ============================================================================
