//! Server-side session rows behind the session cookie.

use chrono::{Duration, Utc};
use rand::RngCore;
use rusqlite::{params, OptionalExtension};

use crate::db::encode_time;
use crate::db::models::User;
use crate::db::users::user_from_row;
use crate::error::AppResult;
use crate::state::DbPool;

const TOKEN_BYTES: usize = 32;

/// Store a fresh session for `user_id` valid for `hours`, returning its token.
/// Expired rows are swept on the way.
pub fn create_session(pool: &DbPool, user_id: &str, hours: u64) -> AppResult<String> {
    let conn = pool.get()?;
    let now = Utc::now();
    let hours = i64::try_from(hours).unwrap_or(i64::MAX);
    let expires_at = now
        .checked_add_signed(Duration::hours(hours.min(24 * 365 * 100)))
        .unwrap_or(now);

    let swept = conn.execute(
        "DELETE FROM sessions WHERE expires_at <= ?1",
        params![encode_time(&now)],
    )?;
    if swept > 0 {
        tracing::debug!(swept, "Removed expired sessions");
    }

    let token = new_token();
    conn.execute(
        "INSERT INTO sessions (id, user_id, token, expires_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            uuid::Uuid::now_v7().to_string(),
            user_id,
            token,
            encode_time(&expires_at),
            encode_time(&now),
        ],
    )?;

    tracing::debug!(user_id, "Session created");
    Ok(token)
}

pub fn delete_session(pool: &DbPool, token: &str) -> AppResult<()> {
    let conn = pool.get()?;
    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(())
}

/// The user owning an unexpired session, if any.
pub fn lookup_user(pool: &DbPool, token: &str) -> AppResult<Option<User>> {
    let conn = pool.get()?;
    let user = conn
        .query_row(
            "SELECT u.id, u.username, u.display_name, u.bio, u.role, u.created_at
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token = ?1 AND s.expires_at > ?2",
            params![token, encode_time(&Utc::now())],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
