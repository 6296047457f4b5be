use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, SignupRequest},
        password::{hash_password, verify_password},
        repo::UserStore,
    },
    error::AppError,
    state::AppState,
};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    // Verified against when the email is unknown so both login failures cost the same.
    static ref DUMMY_HASH: Option<String> = hash_password("leaderboard-dummy-password").ok();
}

pub fn auth_routes() -> Router<AppState> {
    // pay for the dummy hash at startup, not on the first unknown-email login
    lazy_static::initialize(&DUMMY_HASH);
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(mut payload) = payload?;
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::InvalidEmail);
    }

    // Ensure email is not taken; the insert below is still guarded by the unique constraint
    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let hash = hash_password(&payload.password)?;
    let user = state.users.create(&payload.email, &hash).await.map_err(|e| {
        warn!(email = %payload.email, error = %e, "create user failed");
        AppError::from(e)
    })?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok(Json(MessageResponse::new("Signup successful")))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(mut payload) = payload?;
    payload.email = normalize_email(&payload.email);

    let user = match state.users.find_by_email(&payload.email).await? {
        Some(u) => u,
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(&payload.password, dummy);
            }
            warn!(email = %payload.email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        user_id: user.id.to_string(),
    }))
}
