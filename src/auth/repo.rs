use async_trait::async_trait;

use crate::auth::repo_types::User;
use crate::db::{is_unique_violation, PgStore};
use crate::error::StoreError;

/// Access to the `users` table.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by exact email match.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new user. A taken email yields `StoreError::DuplicateEmail`,
    /// whether it is seen by the pre-check or by the unique constraint.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.acquire().await?;
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(user)
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut conn = self.acquire().await?;

        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)"#)
                .bind(email)
                .fetch_one(&mut *conn)
                .await?;
        if exists {
            return Err(StoreError::DuplicateEmail);
        }

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail
            } else {
                StoreError::Unavailable(e)
            }
        })
    }
}
