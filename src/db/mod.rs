pub mod models;
pub mod posts;
pub mod users;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::path::Path;

use crate::state::DbPool;

pub const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial",
    include_str!("../../migrations/001_initial.sql"),
)];

const POOL_SIZE: u32 = 8;

fn apply_pragmas(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.pragma_update(None, "busy_timeout", 5000)
}

/// Open (creating if needed) the database file behind a connection pool.
pub fn create_pool(db_path: &Path) -> anyhow::Result<DbPool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let manager = SqliteConnectionManager::file(db_path).with_init(apply_pragmas);
    let pool = Pool::builder().max_size(POOL_SIZE).build(manager)?;

    // Journal mode is a property of the file, so once is enough.
    let conn = pool.get()?;
    let journal: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    tracing::debug!(path = %db_path.display(), journal, "Database pool ready");

    Ok(pool)
}

/// Apply every pending entry of [`MIGRATIONS`], each in its own transaction.
pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let mut conn = pool.get()?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );",
    )?;

    let mut applied = 0;
    for (name, sql) in MIGRATIONS {
        let tx = conn.transaction()?;
        let done = tx
            .query_row(
                "SELECT 1 FROM schema_version WHERE name = ?1",
                params![name],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if done {
            continue;
        }

        tracing::info!(migration = %name, "Applying migration");
        tx.execute_batch(sql)
            .with_context(|| format!("migration {name} failed"))?;
        tx.execute("INSERT INTO schema_version (name) VALUES (?1)", params![name])?;
        tx.commit()?;
        applied += 1;
    }

    tracing::info!(applied, "Database schema up to date");
    Ok(())
}

/// Timestamps are stored as RFC 3339 text with a fixed precision so that
/// string ordering matches time ordering.
pub(crate) fn encode_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_time(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}
