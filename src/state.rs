//! Shared application state for all routes.

use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Value every protected request must send in `X-API-KEY`.
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(pool: SqlitePool, api_key: impl Into<Arc<str>>) -> Self {
        AppState {
            pool,
            api_key: api_key.into(),
        }
    }
}
