pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

use axum::Router;

use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Open the database, apply migrations, seed the first admin and build the router.
pub async fn build_app(config: &AppConfig) -> Result<Router, AppError> {
    let pool = db::connect(&config.database_url, 5).await?;
    db::migrate(&pool).await?;

    if let Some((username, password)) = &config.bootstrap_admin {
        let mut conn = pool.acquire().await?;
        auth::bootstrap_admin(&mut conn, username, password).await?;
    }

    let state = AppState::new(pool, TokenKeys::new(&config.jwt_secret, config.token_ttl_hours));
    Ok(api::router(state))
}
