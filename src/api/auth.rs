use axum::{Json, Router, extract::State, routing::{get, post}};

use crate::auth::{self, AuthUser};
use crate::db;
use crate::error::AppError;
use crate::models::{LoginRequest, LoginResponse, User};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let mut conn = state.db.acquire().await?;
    let user = auth::authenticate(&mut conn, req.username.trim(), &req.password).await?;
    let token = state.tokens.issue(&user)?;
    Ok(Json(LoginResponse { token, user }))
}

async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<Json<User>, AppError> {
    let mut conn = state.db.acquire().await?;
    let user = db::users::find_by_id(&mut conn, &auth.id)
        .await?
        .ok_or_else(|| AppError::not_found("user", &auth.id))?;
    Ok(Json(user))
}
