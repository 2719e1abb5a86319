//! User repository
//!
//! Three fixed queries over the `users` table: insert, list, get by id.
//! No update or delete. Uniqueness is enforced by the DB constraint and
//! surfaced as `DbError::Duplicate`, never checked-then-inserted.

use sqlx::PgPool;

use crate::models::{User, UserDraft};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("duplicate {field}: '{value}'")]
    Duplicate { field: &'static str, value: String },
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user, returning the stored row with assigned id and
    /// timestamps.
    pub async fn create(&self, draft: &UserDraft) -> Result<User, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email)
            VALUES ($1, $2)
            RETURNING id, username, email, created_at, updated_at
            "#,
        )
        .bind(draft.username())
        .bind(draft.email())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DbError::Duplicate {
                    field: "username",
                    value: draft.username().to_string(),
                }
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(user)
    }

    /// List all users in ascending id order.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at, updated_at FROM users ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Fetch a single user by id.
    pub async fn get(&self, id: i64) -> Result<User, DbError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        user.ok_or_else(|| DbError::NotFound {
            resource: "user",
            id: id.to_string(),
        })
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
