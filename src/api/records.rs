//! Child records created under `/students/{id}/...`.

use axum::extract::Path;
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use sqlx::SqliteConnection;
use tracing::info;

use crate::auth::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::references::{ensure_academic_year, ensure_subject};
use crate::state::AppState;

const TEACHING_ROLES: &[Role] = &[Role::Admin, Role::Teacher];
const GUARDIAN_WRITERS: &[Role] = &[Role::Admin, Role::Staff];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/students/{id}/attendance",
            get(list_attendance).post(record_attendance),
        )
        .route(
            "/students/{id}/academics",
            get(list_academics).post(record_academic),
        )
        .route(
            "/students/{id}/guardians",
            get(list_guardians).post(add_guardian),
        )
}

async fn ensure_student(conn: &mut SqliteConnection, id: &str) -> Result<Student, AppError> {
    db::students::find_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("student", id))
}

async fn list_attendance(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Attendance>>, AppError> {
    let mut conn = state.db.acquire().await?;
    ensure_student(&mut conn, &id).await?;
    Ok(Json(db::records::list_attendance(&mut conn, &id).await?))
}

async fn record_attendance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<NewAttendanceRequest>,
) -> Result<(StatusCode, Json<Attendance>), AppError> {
    auth.require(TEACHING_ROLES)?;
    req.validate()?;

    let mut tx = db::begin_write(&state.db).await?;
    ensure_student(&mut tx, &id).await?;
    if db::records::attendance_exists(&mut tx, &id, &req.date).await? {
        return Err(AppError::BadRequest(format!(
            "attendance for {} is already recorded",
            req.date
        )));
    }

    let attendance = Attendance {
        id: db::new_id(),
        student_id: id,
        date: req.date,
        status: req.status,
        notes: req.notes,
        recorded_by: auth.id,
        created_at: db::now(),
    };
    db::records::insert_attendance(&mut tx, &attendance).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(attendance)))
}

async fn list_academics(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<AcademicRecord>>, AppError> {
    let mut conn = state.db.acquire().await?;
    ensure_student(&mut conn, &id).await?;
    Ok(Json(db::records::list_academic_records(&mut conn, &id).await?))
}

async fn record_academic(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<NewAcademicRecordRequest>,
) -> Result<(StatusCode, Json<AcademicRecord>), AppError> {
    auth.require(TEACHING_ROLES)?;
    req.validate()?;

    let mut tx = db::begin_write(&state.db).await?;
    ensure_student(&mut tx, &id).await?;
    ensure_subject(&mut tx, &req.subject_id).await?;
    ensure_academic_year(&mut tx, &req.academic_year_id).await?;
    if db::records::academic_record_exists(
        &mut tx,
        &id,
        &req.subject_id,
        &req.academic_year_id,
        req.semester,
    )
    .await?
    {
        return Err(AppError::BadRequest(format!(
            "a grade for this subject in semester {} is already recorded",
            req.semester
        )));
    }

    let record = AcademicRecord {
        id: db::new_id(),
        student_id: id,
        subject_id: req.subject_id,
        academic_year_id: req.academic_year_id,
        semester: req.semester,
        score: req.score,
        notes: req.notes,
        recorded_by: auth.id,
        created_at: db::now(),
    };
    db::records::insert_academic_record(&mut tx, &record).await?;
    tx.commit().await?;

    info!(student_id = %record.student_id, subject_id = %record.subject_id, "grade recorded");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_guardians(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Guardian>>, AppError> {
    let mut conn = state.db.acquire().await?;
    ensure_student(&mut conn, &id).await?;
    Ok(Json(db::records::list_guardians(&mut conn, &id).await?))
}

async fn add_guardian(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<NewGuardianRequest>,
) -> Result<(StatusCode, Json<Guardian>), AppError> {
    auth.require(GUARDIAN_WRITERS)?;
    req.validate()?;

    let mut tx = db::begin_write(&state.db).await?;
    ensure_student(&mut tx, &id).await?;

    let guardian = Guardian {
        id: db::new_id(),
        student_id: id,
        name: req.name,
        relationship: req.relationship,
        phone: req.phone,
        email: req.email,
        occupation: req.occupation,
        created_at: db::now(),
    };
    db::records::insert_guardian(&mut tx, &guardian).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(guardian)))
}
