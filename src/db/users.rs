use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::{Role, User};
use crate::error::{AppError, AppResult};

pub struct NewUser<'a> {
    pub username: &'a str,
    pub display_name: &'a str,
    pub bio: Option<&'a str>,
    pub role: Role,
    pub password_hash: &'a str,
}

const USER_COLUMNS: &str = "id, username, display_name, bio, role, created_at";

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        display_name: row.get(2)?,
        bio: row.get(3)?,
        role: Role::parse(&role).unwrap_or(Role::Reader),
        created_at: row.get(5)?,
    })
}

pub fn insert_user(conn: &Connection, new: &NewUser<'_>) -> AppResult<User> {
    if find_by_username(conn, new.username)?.is_some() {
        return Err(AppError::BadRequest("Username is already taken".into()));
    }

    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO users (id, username, display_name, bio, role, password_hash)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            new.username,
            new.display_name,
            new.bio,
            new.role.as_str(),
            new.password_hash
        ],
    )?;

    tracing::info!(user_id = %id, username = new.username, role = new.role.as_str(), "Created user");

    find_by_id(conn, &id)?.ok_or_else(|| AppError::Internal("Inserted user vanished".into()))
}

pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

/// Usernames are stored lowercase; lookups ignore case and surrounding space.
pub fn username_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn find_by_username(conn: &Connection, username: &str) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username_key(username)],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

/// Returns the user along with the stored password hash.
pub fn find_credentials(conn: &Connection, username: &str) -> AppResult<Option<(User, String)>> {
    let found = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = ?1"),
            params![username_key(username)],
            |row| Ok((user_from_row(row)?, row.get::<_, String>(6)?)),
        )
        .optional()?;
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::migrated_pool;

    fn writer<'a>(username: &'a str) -> NewUser<'a> {
        NewUser {
            username,
            display_name: "Ada Lovelace",
            bio: Some("Notes on the engine"),
            role: Role::Writer,
            password_hash: "hash",
        }
    }

    #[test]
    fn insert_then_find_by_username() {
        let pool = migrated_pool();
        let conn = pool.get().unwrap();
        let created = insert_user(&conn, &writer("ada")).unwrap();

        let found = find_by_username(&conn, "ada").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.display_name, "Ada Lovelace");
        assert_eq!(found.role, Role::Writer);
        assert_eq!(found.bio.as_deref(), Some("Notes on the engine"));
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let pool = migrated_pool();
        let conn = pool.get().unwrap();
        insert_user(&conn, &writer("ada")).unwrap();

        let err = insert_user(&conn, &writer("ada")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn credentials_include_hash() {
        let pool = migrated_pool();
        let conn = pool.get().unwrap();
        insert_user(&conn, &writer("ada")).unwrap();

        let (user, hash) = find_credentials(&conn, "ada").unwrap().unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(hash, "hash");
        assert!(find_credentials(&conn, "grace").unwrap().is_none());
    }

    #[test]
    fn lookups_ignore_case() {
        let pool = migrated_pool();
        let conn = pool.get().unwrap();
        let created = insert_user(&conn, &writer("ada")).unwrap();

        let found = find_by_username(&conn, " Ada ").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(find_credentials(&conn, "ADA").unwrap().is_some());
    }
}
