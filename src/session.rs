//! Per-request authentication snapshot.
//!
//! A [`Session`] starts out `loading` while the cookie lookup runs and is
//! replaced by the resolved state once it completes. Handlers receive it
//! through the extractor in [`crate::extractors`] and hand it to the access
//! gate; nothing mutates it after resolution.

use std::time::Duration;

use crate::auth::session::lookup_user;
use crate::db::models::User;
use crate::error::{AppError, AppResult};
use crate::state::DbPool;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub loading: bool,
}

impl Session {
    pub fn pending() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
            loading: false,
        }
    }

    /// Settle a finished lookup. A failed lookup is treated as signed out.
    pub fn from_resolution(result: AppResult<Option<User>>) -> Self {
        match result {
            Ok(Some(user)) => Self::signed_in(user),
            Ok(None) => Self::anonymous(),
            Err(e) => {
                tracing::warn!("Session lookup failed, continuing signed out: {}", e);
                Self::anonymous()
            }
        }
    }

    /// Resolve a session token against the store within `limit`. A lookup
    /// still running at the deadline leaves the session pending; the lookup
    /// itself is not cancelled.
    pub async fn resolve(pool: DbPool, token: String, limit: Duration) -> Self {
        let lookup = tokio::task::spawn_blocking(move || lookup_user(&pool, &token));

        match tokio::time::timeout(limit, lookup).await {
            Ok(Ok(result)) => Self::from_resolution(result),
            Ok(Err(join_err)) => Self::from_resolution(Err(AppError::Internal(join_err.to_string()))),
            Err(_) => {
                tracing::warn!(timeout_ms = limit.as_millis() as u64, "Session lookup timed out");
                Self::pending()
            }
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::create_session;
    use crate::db::models::Role;
    use crate::db::test_support::migrated_pool;
    use crate::db::users::{insert_user, NewUser};
    use crate::gate::{decide, Decision, PUBLIC, WRITE_VIEW};
    use r2d2::Pool;
    use r2d2_sqlite::SqliteConnectionManager;

    #[test]
    fn failed_resolution_degrades_to_anonymous() {
        let session = Session::from_resolution(Err(AppError::Internal("store down".into())));
        assert_eq!(session, Session::anonymous());
        assert!(!session.loading);
    }

    #[test]
    fn pending_session_is_loading_and_signed_out() {
        let session = Session::pending();
        assert!(session.loading);
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
    }

    #[tokio::test]
    async fn resolve_finds_the_signed_in_user() {
        let pool = migrated_pool();
        let user = insert_user(
            &pool.get().unwrap(),
            &NewUser {
                username: "ada",
                display_name: "Ada",
                bio: None,
                role: Role::Writer,
                password_hash: "hash",
            },
        )
        .unwrap();
        let token = create_session(&pool, &user.id, 1).unwrap();

        let session = Session::resolve(pool, token, Duration::from_secs(5)).await;
        assert!(session.is_authenticated);
        assert_eq!(session.user().map(|u| u.username.as_str()), Some("ada"));
    }

    #[tokio::test]
    async fn resolve_unknown_token_is_anonymous() {
        let pool = migrated_pool();
        let session = Session::resolve(pool, "nope".into(), Duration::from_secs(5)).await;
        assert_eq!(session, Session::anonymous());
    }

    #[tokio::test]
    async fn slow_lookup_leaves_session_pending() {
        let pool = migrated_pool();
        // Holding the only connection stalls the lookup at `pool.get()`.
        let held = pool.get().unwrap();

        let session = Session::resolve(pool.clone(), "token".into(), Duration::from_millis(50)).await;
        drop(held);

        assert!(session.loading);
        assert!(!session.is_authenticated);
        assert_eq!(decide(&session, &PUBLIC), Decision::Pending);
        assert_eq!(decide(&session, &WRITE_VIEW), Decision::Pending);
    }

    #[tokio::test]
    async fn resolve_against_broken_store_is_anonymous() {
        // No migrations: the sessions table does not exist.
        let pool = Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())
            .unwrap();
        let session = Session::resolve(pool, "token".into(), Duration::from_secs(5)).await;
        assert_eq!(session, Session::anonymous());
    }
}
