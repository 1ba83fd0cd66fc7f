//! Persistent key-value store on the `kv_entries` table
//!
//! Correlation mappings must survive restarts between a sign request and
//! its webhooks, so this is the default backend. Expired rows read as absent
//! and are deleted on access.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use esignbridge_core::KeyValueStore;
use esignbridge_domain::Result;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task;

use crate::database::manager::{map_join_error, map_sql_error};
use crate::database::DbManager;

pub struct SqliteKeyValueStore {
    db: Arc<DbManager>,
}

impl SqliteKeyValueStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();

        task::spawn_blocking(move || -> Result<Option<String>> {
            let conn = db.get_connection()?;
            read_entry(&conn, &key, Utc::now().timestamp_millis()).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();
        let value = value.to_string();
        let expires_at = ttl.map(|ttl| {
            Utc::now().timestamp_millis() + i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX / 2)
        });

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            write_entry(&conn, &key, &value, expires_at).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])
                .map(|_| ())
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// ============================================================================
// SQL Operations (synchronous)
// ============================================================================

fn read_entry(conn: &Connection, key: &str, now_ms: i64) -> rusqlite::Result<Option<String>> {
    let row: Option<(String, Option<i64>)> = conn
        .query_row(
            "SELECT value, expires_at FROM kv_entries WHERE key = ?1",
            params![key],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match row {
        Some((_, Some(expires_at))) if expires_at <= now_ms => {
            conn.execute(
                "DELETE FROM kv_entries WHERE key = ?1 AND expires_at <= ?2",
                params![key, now_ms],
            )?;
            Ok(None)
        }
        Some((value, _)) => Ok(Some(value)),
        None => Ok(None),
    }
}

fn write_entry(
    conn: &Connection,
    key: &str,
    value: &str,
    expires_at: Option<i64>,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO kv_entries (key, value, expires_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
        params![key, value, expires_at],
    )?;
    Ok(())
}
