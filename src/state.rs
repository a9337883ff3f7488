use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::TokenKeys;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(db: SqlitePool, tokens: TokenKeys) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
        }
    }
}
