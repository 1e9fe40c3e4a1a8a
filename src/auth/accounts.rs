use rusqlite::Connection;

use crate::auth::password::{hash_password, verify_password};
use crate::db::models::NewUser;
use crate::db::users::{self, InsertUserError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Username already exists!")]
    DuplicateUsername,

    #[error("User not found.")]
    UserNotFound,

    #[error("Incorrect password.")]
    IncorrectPassword,

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),
}

impl AuthError {
    /// Errors the user caused, shown inline on the form.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AuthError::DuplicateUsername | AuthError::UserNotFound | AuthError::IncorrectPassword
        )
    }
}

impl From<InsertUserError> for AuthError {
    fn from(err: InsertUserError) -> Self {
        match err {
            InsertUserError::DuplicateUsername => AuthError::DuplicateUsername,
            InsertUserError::Sql(e) => AuthError::Sql(e),
        }
    }
}

/// A registration request that has already passed form validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
}

/// Identity established by a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
}

pub fn register(
    conn: &Connection,
    registration: Registration,
    bcrypt_cost: u32,
) -> Result<i64, AuthError> {
    let password_hash = hash_password(&registration.password, bcrypt_cost)?;
    let user_id = users::insert(
        conn,
        &NewUser {
            username: registration.username,
            password_hash,
            age: registration.age,
            gender: registration.gender,
        },
    )?;
    Ok(user_id)
}

pub fn login(
    conn: &Connection,
    username: &str,
    password: &str,
) -> Result<AuthenticatedUser, AuthError> {
    let user = users::find_by_username(conn, username)?.ok_or(AuthError::UserNotFound)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AuthError::IncorrectPassword);
    }

    Ok(AuthenticatedUser {
        id: user.id,
        username: user.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    const COST: u32 = 4;

    fn registration(username: &str, password: &str) -> Registration {
        Registration {
            username: username.to_string(),
            password: password.to_string(),
            age: Some(30),
            gender: None,
        }
    }

    #[test]
    fn registering_twice_keeps_one_user() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        register(&conn, registration("alice", "pw"), COST).unwrap();
        let err = register(&conn, registration("alice", "other"), COST).unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername));
        assert_eq!(users::count(&conn).unwrap(), 1);
    }

    #[test]
    fn stored_password_is_a_digest() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        register(&conn, registration("alice", "pw"), COST).unwrap();
        let user = users::find_by_username(&conn, "alice").unwrap().unwrap();
        assert_ne!(user.password_hash, "pw");
    }

    #[test]
    fn login_outcomes() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let id = register(&conn, registration("alice", "pw"), COST).unwrap();

        let user = login(&conn, "alice", "pw").unwrap();
        assert_eq!(
            user,
            AuthenticatedUser {
                id,
                username: "alice".to_string()
            }
        );

        assert!(matches!(
            login(&conn, "alice", "wrong"),
            Err(AuthError::IncorrectPassword)
        ));
        assert!(matches!(
            login(&conn, "bob", "pw"),
            Err(AuthError::UserNotFound)
        ));
    }

    #[test]
    fn user_facing_errors_are_classified() {
        assert!(AuthError::DuplicateUsername.is_user_facing());
        assert!(AuthError::UserNotFound.is_user_facing());
        assert!(AuthError::IncorrectPassword.is_user_facing());
        assert!(!AuthError::Sql(rusqlite::Error::QueryReturnedNoRows).is_user_facing());
    }
}
