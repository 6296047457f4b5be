use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Score record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Score {
    pub id: Uuid,
    pub user_id: Uuid, // not checked against users
    pub score: i32,
    pub created_at: OffsetDateTime,
}
