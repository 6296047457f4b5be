use async_trait::async_trait;
use uuid::Uuid;

use crate::db::PgStore;
use crate::error::StoreError;
use crate::scores::repo_types::Score;

/// Access to the `scores` table.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Record a score. `user_id` is stored as given.
    async fn create(&self, user_id: Uuid, score: i32) -> Result<Score, StoreError>;

    /// The `n` best scores, highest first; ties go to the earlier submission.
    async fn top_n(&self, n: i64) -> Result<Vec<Score>, StoreError>;
}

#[async_trait]
impl ScoreStore for PgStore {
    async fn create(&self, user_id: Uuid, score: i32) -> Result<Score, StoreError> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query_as::<_, Score>(
            r#"
            INSERT INTO scores (user_id, score)
            VALUES ($1, $2)
            RETURNING id, user_id, score, created_at
            "#,
        )
        .bind(user_id)
        .bind(score)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row)
    }

    async fn top_n(&self, n: i64) -> Result<Vec<Score>, StoreError> {
        let mut conn = self.acquire().await?;
        let rows = sqlx::query_as::<_, Score>(
            r#"
            SELECT id, user_id, score, created_at
            FROM scores
            ORDER BY score DESC, created_at ASC, id ASC
            LIMIT $1
            "#,
        )
        .bind(n)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }
}
