use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::dto::MessageResponse,
    error::AppError,
    scores::repo::ScoreStore,
    scores::dto::{LeaderboardEntry, SubmitScoreQuery, SubmitScoreRequest},
    state::AppState,
};

pub const LEADERBOARD_SIZE: i64 = 10;

pub fn score_routes() -> Router<AppState> {
    Router::new()
        .route("/score", post(submit_score))
        .route("/leaderboard", get(get_leaderboard))
}

/// POST /score?user_id=<uuid> { score }
///
/// The user id is taken from the query string as-is; nothing ties it to an
/// authenticated caller, and it is not checked against the users table.
#[instrument(skip(state, query, payload))]
pub async fn submit_score(
    State(state): State<AppState>,
    query: Result<Query<SubmitScoreQuery>, QueryRejection>,
    payload: Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Query(query) = query?;
    let Json(payload) = payload?;
    let score = state.scores.create(query.user_id, payload.score).await?;
    info!(score_id = %score.id, user_id = %score.user_id, score = score.score, "score submitted");
    Ok(Json(MessageResponse::new("Score submitted!")))
}

#[instrument(skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let rows = state.scores.top_n(LEADERBOARD_SIZE).await?;
    Ok(Json(rows.into_iter().map(LeaderboardEntry::from).collect()))
}
