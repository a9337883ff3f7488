use axum::extract::{Path, Query};
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;
use tracing::info;

use crate::auth::{self, AuthUser};
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

#[derive(Deserialize)]
struct UserQuery {
    role: Option<Role>,
}

const TEACHER_ASSIGNMENTS: &[(&str, &str, &str)] = &[
    ("classes", "teacher_id", "class"),
    ("schedules", "teacher_id", "schedule"),
];

const USER_DEPENDENTS: &[(&str, &str, &str)] = &[
    ("classes", "teacher_id", "class"),
    ("schedules", "teacher_id", "schedule"),
    ("attendance", "recorded_by", "attendance record"),
    ("academic_records", "recorded_by", "academic record"),
];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
}

async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PaginationParams>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Paginated<User>>, AppError> {
    auth.require_admin()?;
    let page = Pagination::from(&page);
    let mut conn = state.db.acquire().await?;
    let (users, total) = db::users::list(&mut conn, query.role, page).await?;
    Ok(Json(Paginated::new(users, total, page)))
}

async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    auth.require_admin()?;
    let mut conn = state.db.acquire().await?;
    let user = db::users::find_by_id(&mut conn, &id)
        .await?
        .ok_or_else(|| AppError::not_found("user", &id))?;
    Ok(Json(user))
}

async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    auth.require_admin()?;
    req.validate()?;

    let password_hash = auth::hash_password(&req.password).await?;
    let mut tx = db::begin_write(&state.db).await?;
    if db::users::username_taken(&mut tx, &req.username, None).await? {
        return Err(AppError::BadRequest(format!("username '{}' is already taken", req.username)));
    }

    let now = db::now();
    let user = User {
        id: db::new_id(),
        username: req.username,
        password_hash,
        role: req.role,
        name: req.name,
        email: req.email,
        status: req.status.unwrap_or_default(),
        created_at: now.clone(),
        updated_at: now,
    };
    db::users::insert(&mut tx, &user).await?;
    tx.commit().await?;

    info!(user_id = %user.id, role = user.role.as_str(), "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    auth.require_admin()?;
    req.validate()?;

    let new_password_hash = match &req.password {
        Some(password) => Some(auth::hash_password(password).await?),
        None => None,
    };

    let mut tx = db::begin_write(&state.db).await?;
    let mut user = db::users::find_by_id(&mut tx, &id)
        .await?
        .ok_or_else(|| AppError::not_found("user", &id))?;

    if let Some(username) = req.username {
        if db::users::username_taken(&mut tx, &username, Some(&id)).await? {
            return Err(AppError::BadRequest(format!("username '{}' is already taken", username)));
        }
        user.username = username;
    }
    if let Some(role) = req.role {
        if user.role == Role::Teacher && role != Role::Teacher {
            if let Some(assigned) = db::describe_dependents(&mut tx, &id, TEACHER_ASSIGNMENTS).await? {
                return Err(AppError::BadRequest(format!(
                    "cannot change role of '{}': still assigned to {}",
                    user.username, assigned
                )));
            }
        }
        if id == auth.id && role != Role::Admin {
            return Err(AppError::BadRequest("cannot remove your own admin role".to_string()));
        }
        user.role = role;
    }
    if let Some(password_hash) = new_password_hash {
        user.password_hash = password_hash;
    }
    if let Some(name) = req.name {
        user.name = name;
    }
    if req.email.is_some() {
        user.email = req.email;
    }
    if let Some(status) = req.status {
        if id == auth.id && !status.is_active() {
            return Err(AppError::BadRequest("cannot deactivate your own account".to_string()));
        }
        user.status = status;
    }
    user.updated_at = db::now();

    db::users::update(&mut tx, &user).await?;
    tx.commit().await?;
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;
    if id == auth.id {
        return Err(AppError::BadRequest("cannot delete your own account".to_string()));
    }

    let mut tx = db::begin_write(&state.db).await?;
    let user = db::users::find_by_id(&mut tx, &id)
        .await?
        .ok_or_else(|| AppError::not_found("user", &id))?;
    if let Some(dependents) = db::describe_dependents(&mut tx, &id, USER_DEPENDENTS).await? {
        return Err(AppError::BadRequest(format!(
            "cannot delete user '{}': still referenced by {}",
            user.username, dependents
        )));
    }
    db::users::delete(&mut tx, &id).await?;
    tx.commit().await?;

    info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
