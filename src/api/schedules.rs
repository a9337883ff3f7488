use axum::extract::{Path, Query};
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use tracing::info;

use crate::auth::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schedules", get(list_schedules).post(create_schedule))
        .route(
            "/schedules/{id}",
            get(get_schedule).put(update_schedule).delete(delete_schedule),
        )
}

async fn list_schedules(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(page): Query<PaginationParams>,
    Query(filter): Query<ScheduleFilter>,
) -> Result<Json<Paginated<Schedule>>, AppError> {
    let page = Pagination::from(&page);
    let mut conn = state.db.acquire().await?;
    let (schedules, total) = db::schedules::list(&mut conn, &filter, page).await?;
    Ok(Json(Paginated::new(schedules, total, page)))
}

async fn get_schedule(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Schedule>, AppError> {
    let mut conn = state.db.acquire().await?;
    let schedule = db::schedules::find_by_id(&mut conn, &id)
        .await?
        .ok_or_else(|| AppError::not_found("schedule", &id))?;
    Ok(Json(schedule))
}

async fn create_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewScheduleRequest>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    auth.require_admin()?;

    let now = db::now();
    let schedule = Schedule {
        id: db::new_id(),
        class_id: req.class_id,
        subject_id: req.subject_id,
        teacher_id: req.teacher_id,
        day_of_week: req.day_of_week,
        start_time: req.start_time,
        end_time: req.end_time,
        room: req.room,
        status: req.status.unwrap_or_default(),
        created_at: now.clone(),
        updated_at: now,
    };

    let mut tx = db::begin_write(&state.db).await?;
    services::validate_schedule(&mut tx, &schedule).await?;
    db::schedules::insert(&mut tx, &schedule).await?;
    tx.commit().await?;

    info!(
        schedule_id = %schedule.id,
        class_id = %schedule.class_id,
        day = schedule.day_of_week,
        "schedule created {}-{}",
        schedule.start_time,
        schedule.end_time
    );
    Ok((StatusCode::CREATED, Json(schedule)))
}

async fn update_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateScheduleRequest>,
) -> Result<Json<Schedule>, AppError> {
    auth.require_admin()?;

    let mut tx = db::begin_write(&state.db).await?;
    let mut schedule = db::schedules::find_by_id(&mut tx, &id)
        .await?
        .ok_or_else(|| AppError::not_found("schedule", &id))?;
    schedule.merge(req);
    services::validate_schedule(&mut tx, &schedule).await?;

    schedule.updated_at = db::now();
    db::schedules::update(&mut tx, &schedule).await?;
    tx.commit().await?;
    Ok(Json(schedule))
}

async fn delete_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;

    let mut conn = state.db.acquire().await?;
    if db::schedules::delete(&mut conn, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("schedule", &id))
    }
}
