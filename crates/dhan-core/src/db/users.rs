//! User account operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewUser, User};

impl Database {
    /// Register a new user, returns the stored user
    ///
    /// Emails are unique; registering an existing email is an `InvalidData` error.
    pub fn create_user(&self, new: &NewUser) -> Result<User> {
        let conn = self.conn()?;

        let result = conn.execute(
            "INSERT INTO users (email, full_name, password_hash) VALUES (?, ?, ?)",
            params![new.email, new.full_name, new.password_hash],
        );

        match result {
            Ok(_) => self.get_user(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::InvalidData(format!(
                    "Email {} is already registered",
                    new.email
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<User> {
        let conn = self.conn()?;

        conn.query_row(
            "SELECT id, email, full_name, created_at FROM users WHERE id = ?",
            params![id],
            row_to_user,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }

    /// Look up a user by email
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;

        conn.query_row(
            "SELECT id, email, full_name, created_at FROM users WHERE email = ?",
            params![email],
            row_to_user,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Look up a user and their stored password hash by email
    ///
    /// Returns `None` for unknown emails so login can treat unknown-user and
    /// wrong-password identically.
    pub fn find_credentials(&self, email: &str) -> Result<Option<(User, String)>> {
        let conn = self.conn()?;

        conn.query_row(
            "SELECT id, email, full_name, created_at, password_hash FROM users WHERE email = ?",
            params![email],
            |row| {
                let user = row_to_user(row)?;
                let hash: String = row.get(4)?;
                Ok((user, hash))
            },
        )
        .optional()
        .map_err(Into::into)
    }
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        created_at: parse_datetime(&created_at),
    })
}
