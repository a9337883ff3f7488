use axum::extract::{Path, Query};
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use tracing::info;

use crate::auth::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

const STUDENT_WRITERS: &[Role] = &[Role::Admin, Role::Staff];

// Guardians are removed together with the student.
const STUDENT_DEPENDENTS: &[(&str, &str, &str)] = &[
    ("enrollments", "student_id", "enrollment"),
    ("attendance", "student_id", "attendance record"),
    ("academic_records", "student_id", "academic record"),
];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}

async fn list_students(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(page): Query<PaginationParams>,
    Query(filter): Query<StudentFilter>,
) -> Result<Json<Paginated<Student>>, AppError> {
    let page = Pagination::from(&page);
    let mut conn = state.db.acquire().await?;
    let (students, total) = db::students::list(&mut conn, &filter, page).await?;
    Ok(Json(Paginated::new(students, total, page)))
}

async fn get_student(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let mut conn = state.db.acquire().await?;
    let student = db::students::find_by_id(&mut conn, &id)
        .await?
        .ok_or_else(|| AppError::not_found("student", &id))?;
    Ok(Json(student))
}

async fn create_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewStudentRequest>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    auth.require(STUDENT_WRITERS)?;
    req.validate()?;

    let mut tx = db::begin_write(&state.db).await?;
    if db::students::number_taken(&mut tx, &req.student_number, None).await? {
        return Err(AppError::BadRequest(format!(
            "student number '{}' is already in use",
            req.student_number
        )));
    }

    let now = db::now();
    let student = Student {
        id: db::new_id(),
        student_number: req.student_number,
        name: req.name,
        gender: req.gender,
        birth_date: req.birth_date,
        address: req.address,
        phone: req.phone,
        email: req.email,
        status: req.status.unwrap_or_default(),
        created_at: now.clone(),
        updated_at: now,
    };
    db::students::insert(&mut tx, &student).await?;
    tx.commit().await?;

    info!(student_id = %student.id, "student created");
    Ok((StatusCode::CREATED, Json(student)))
}

async fn update_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<Json<Student>, AppError> {
    auth.require(STUDENT_WRITERS)?;

    let mut tx = db::begin_write(&state.db).await?;
    let mut student = db::students::find_by_id(&mut tx, &id)
        .await?
        .ok_or_else(|| AppError::not_found("student", &id))?;
    student.apply(req)?;
    if db::students::number_taken(&mut tx, &student.student_number, Some(&id)).await? {
        return Err(AppError::BadRequest(format!(
            "student number '{}' is already in use",
            student.student_number
        )));
    }
    student.updated_at = db::now();

    db::students::update(&mut tx, &student).await?;
    tx.commit().await?;
    Ok(Json(student))
}

async fn delete_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    auth.require(STUDENT_WRITERS)?;

    let mut tx = db::begin_write(&state.db).await?;
    let student = db::students::find_by_id(&mut tx, &id)
        .await?
        .ok_or_else(|| AppError::not_found("student", &id))?;
    if let Some(dependents) = db::describe_dependents(&mut tx, &id, STUDENT_DEPENDENTS).await? {
        return Err(AppError::BadRequest(format!(
            "cannot delete student '{}': it still has {}",
            student.name, dependents
        )));
    }
    db::students::delete(&mut tx, &id).await?;
    tx.commit().await?;

    info!(student_id = %id, "student deleted");
    Ok(StatusCode::NO_CONTENT)
}
