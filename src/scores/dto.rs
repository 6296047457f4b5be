use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::scores::repo_types::Score;

/// Query string of `POST /score`. The caller names the user it submits for.
#[derive(Debug, Deserialize)]
pub struct SubmitScoreQuery {
    pub user_id: Uuid,
}

/// Request body for score submission.
#[derive(Debug, Deserialize)]
pub struct SubmitScoreRequest {
    pub score: i32,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub score: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl From<Score> for LeaderboardEntry {
    fn from(s: Score) -> Self {
        Self {
            score: s.score,
            timestamp: s.created_at,
        }
    }
}
