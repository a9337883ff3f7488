use axum::extract::{Path, Query};
use axum::routing::delete;
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use tracing::info;

use crate::auth::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services;
use crate::state::AppState;

const ROSTER_ROLES: &[Role] = &[Role::Admin, Role::Staff];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes).post(create_class))
        .route(
            "/classes/{id}",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route("/classes/{id}/students", get(list_roster).post(enroll_student))
        .route("/classes/{id}/students/{student_id}", delete(withdraw_student))
}

async fn list_classes(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(page): Query<PaginationParams>,
    Query(filter): Query<ClassFilter>,
) -> Result<Json<Paginated<ClassView>>, AppError> {
    let page = Pagination::from(&page);
    let mut conn = state.db.acquire().await?;
    let (classes, total) = db::classes::list(&mut conn, &filter, page).await?;
    Ok(Json(Paginated::new(classes, total, page)))
}

async fn get_class(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ClassView>, AppError> {
    let mut conn = state.db.acquire().await?;
    let class = db::classes::find_view(&mut conn, &id)
        .await?
        .ok_or_else(|| AppError::not_found("class", &id))?;
    Ok(Json(class))
}

async fn create_class(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewClassRequest>,
) -> Result<(StatusCode, Json<ClassView>), AppError> {
    auth.require_admin()?;

    let mut tx = db::begin_write(&state.db).await?;
    services::validate_new_class(&mut tx, &req).await?;

    let now = db::now();
    let class = ClassRoom {
        id: db::new_id(),
        name: req.name,
        grade: req.grade,
        major_id: req.major_id,
        teacher_id: req.teacher_id,
        academic_year_id: req.academic_year_id,
        capacity: req.capacity,
        status: req.status.unwrap_or_default(),
        created_at: now.clone(),
        updated_at: now,
    };
    db::classes::insert(&mut tx, &class).await?;
    tx.commit().await?;

    info!(class_id = %class.id, name = %class.name, capacity = class.capacity, "class created");
    Ok((
        StatusCode::CREATED,
        Json(ClassView {
            class,
            enrolled_count: 0,
        }),
    ))
}

async fn update_class(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateClassRequest>,
) -> Result<Json<ClassView>, AppError> {
    auth.require_admin()?;

    let mut tx = db::begin_write(&state.db).await?;
    let mut class = db::classes::find_by_id(&mut tx, &id)
        .await?
        .ok_or_else(|| AppError::not_found("class", &id))?;
    services::validate_class_update(&mut tx, &class, &req).await?;

    class.merge(&req);
    class.updated_at = db::now();
    db::classes::update(&mut tx, &class).await?;

    let view = db::classes::find_view(&mut tx, &id)
        .await?
        .ok_or_else(|| AppError::not_found("class", &id))?;
    tx.commit().await?;
    Ok(Json(view))
}

async fn delete_class(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;

    let mut tx = db::begin_write(&state.db).await?;
    let class = db::classes::find_by_id(&mut tx, &id)
        .await?
        .ok_or_else(|| AppError::not_found("class", &id))?;
    services::ensure_class_deletable(&mut tx, &class).await?;
    db::classes::delete(&mut tx, &id).await?;
    tx.commit().await?;

    info!(class_id = %id, "class deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_roster(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<EnrolledStudent>>, AppError> {
    let mut conn = state.db.acquire().await?;
    if db::classes::find_by_id(&mut conn, &id).await?.is_none() {
        return Err(AppError::not_found("class", &id));
    }
    let roster = db::enrollments::roster(&mut conn, &id).await?;
    Ok(Json(roster))
}

async fn enroll_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    auth.require(ROSTER_ROLES)?;

    let mut tx = db::begin_write(&state.db).await?;
    let class = db::classes::find_by_id(&mut tx, &id)
        .await?
        .ok_or_else(|| AppError::not_found("class", &id))?;
    let enrollment = services::enroll(&mut tx, &class, &req.student_id).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(enrollment)))
}

async fn withdraw_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, student_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    auth.require(ROSTER_ROLES)?;

    let mut conn = state.db.acquire().await?;
    if db::enrollments::delete(&mut conn, &id, &student_id).await? {
        info!(class_id = %id, student_id = %student_id, "student withdrawn");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "student '{}' is not enrolled in class '{}'",
            student_id, id
        )))
    }
}
