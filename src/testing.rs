//! In-memory accessors and request helpers for handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    app::build_app,
    auth::{repo::UserStore, repo_types::User},
    error::StoreError,
    scores::{repo::ScoreStore, repo_types::Score},
    state::AppState,
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    scores: Mutex<Vec<Score>>,
    hide_users: bool,
    fail: bool,
}

impl MemoryStore {
    /// `find_by_email` never sees existing rows, as if a concurrent signup
    /// slipped between the check and the insert.
    pub fn hide_users_from_lookup(mut self) -> Self {
        self.hide_users = true;
        self
    }

    /// Seed a score row with a fixed submission time.
    pub fn with_score(self, score: i32, created_at: OffsetDateTime) -> Self {
        self.scores.lock().unwrap().push(Score {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            score,
            created_at,
        });
        self
    }

    /// Every call fails as if the database were unreachable.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check()?;
        if self.hide_users {
            return Ok(None);
        }
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ScoreStore for MemoryStore {
    async fn create(&self, user_id: Uuid, score: i32) -> Result<Score, StoreError> {
        self.check()?;
        let row = Score {
            id: Uuid::new_v4(),
            user_id,
            score,
            created_at: OffsetDateTime::now_utc(),
        };
        self.scores.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn top_n(&self, n: i64) -> Result<Vec<Score>, StoreError> {
        self.check()?;
        let mut rows = self.scores.lock().unwrap().clone();
        // stable sort keeps insertion order for equal keys
        rows.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        rows.truncate(usize::try_from(n).unwrap_or(0));
        Ok(rows)
    }
}

pub fn test_app_with(store: Arc<MemoryStore>) -> Router {
    let state = AppState::from_parts(
        store.clone() as Arc<dyn UserStore>,
        store as Arc<dyn ScoreStore>,
    );
    build_app(state)
}

pub fn test_app() -> Router {
    test_app_with(Arc::new(MemoryStore::default()))
}

/// Drive one request through the router. Non-JSON bodies come back as `Null`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
