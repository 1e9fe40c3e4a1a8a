use rusqlite::{ffi, params, Connection, OptionalExtension, Row};

use crate::db::models::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum InsertUserError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("user_id")?,
        username: row.get("username")?,
        password_hash: row.get("password")?,
        age: row.get("age")?,
        gender: row.get("gender")?,
    })
}

/// Insert a user, returning the new id. A taken username maps to
/// `DuplicateUsername` and leaves the table untouched.
pub fn insert(conn: &Connection, user: &NewUser) -> Result<i64, InsertUserError> {
    let result = conn.execute(
        "INSERT INTO users (username, password, age, gender) VALUES (?1, ?2, ?3, ?4)",
        params![user.username, user.password_hash, user.age, user.gender],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(InsertUserError::DuplicateUsername)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT user_id, username, password, age, gender FROM users WHERE username = ?1",
        params![username],
        user_from_row,
    )
    .optional()
}

#[cfg(test)]
pub(crate) fn count(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
}
