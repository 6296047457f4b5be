use std::sync::Arc;

use crate::auth::repo::UserStore;
use crate::config::AppConfig;
use crate::db::{self, PgStore};
use crate::scores::repo::ScoreStore;

/// Handles shared by every request. Holds no mutable state of its own.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub scores: Arc<dyn ScoreStore>,
}

impl AppState {
    /// Connects to Postgres, applies migrations and wires the accessors.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(config).await?;
        db::migrate(&pool).await?;
        tracing::info!(max_connections = config.max_connections, "database ready");

        let store = Arc::new(PgStore::new(pool));
        Ok(Self::from_parts(
            store.clone() as Arc<dyn UserStore>,
            store as Arc<dyn ScoreStore>,
        ))
    }

    pub fn from_parts(users: Arc<dyn UserStore>, scores: Arc<dyn ScoreStore>) -> Self {
        Self { users, scores }
    }
}
