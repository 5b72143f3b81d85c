//! User repository.
//!
//! Users are keyed by their Google subject; signing in again refreshes the
//! stored profile instead of creating a second row.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use recipe_finder_core::UserId;

use super::RepositoryError;
use crate::models::User;

/// Profile fields written on every sign-in.
#[derive(Debug, Clone, Copy)]
pub struct UpsertUser<'a> {
    pub google_subject: &'a str,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub image: Option<&'a str>,
}

/// Internal row type for the `users` table.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    google_subject: String,
    name: String,
    email: Option<String>,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id.to_string()),
            google_subject: row.google_subject,
            name: row.name,
            email: row.email,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert the user, or refresh the profile of an existing one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, user: UpsertUser<'_>) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (google_subject, name, email, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (google_subject) DO UPDATE
            SET name = EXCLUDED.name,
                email = EXCLUDED.email,
                image = EXCLUDED.image,
                updated_at = now()
            RETURNING id, google_subject, name, email, image, created_at, updated_at
            ",
        )
        .bind(user.google_subject)
        .bind(user.name)
        .bind(user.email)
        .bind(user.image)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}
