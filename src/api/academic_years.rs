use axum::extract::{Path, Query};
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use tracing::info;

use crate::auth::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

const YEAR_DEPENDENTS: &[(&str, &str, &str)] = &[
    ("classes", "academic_year_id", "class"),
    ("academic_records", "academic_year_id", "academic record"),
];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/academic-years", get(list_years).post(create_year))
        .route(
            "/academic-years/{id}",
            get(get_year).put(update_year).delete(delete_year),
        )
}

async fn list_years(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(page): Query<PaginationParams>,
) -> Result<Json<Paginated<AcademicYear>>, AppError> {
    let page = Pagination::from(&page);
    let mut conn = state.db.acquire().await?;
    let (years, total) = db::academic_years::list(&mut conn, page).await?;
    Ok(Json(Paginated::new(years, total, page)))
}

async fn get_year(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<AcademicYear>, AppError> {
    let mut conn = state.db.acquire().await?;
    let year = db::academic_years::find_by_id(&mut conn, &id)
        .await?
        .ok_or_else(|| AppError::not_found("academic year", &id))?;
    Ok(Json(year))
}

async fn create_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewAcademicYearRequest>,
) -> Result<(StatusCode, Json<AcademicYear>), AppError> {
    auth.require_admin()?;
    req.validate()?;

    let mut tx = db::begin_write(&state.db).await?;
    if db::academic_years::name_taken(&mut tx, &req.name, None).await? {
        return Err(AppError::BadRequest(format!("academic year '{}' already exists", req.name)));
    }

    let now = db::now();
    let year = AcademicYear {
        id: db::new_id(),
        name: req.name,
        start_date: req.start_date,
        end_date: req.end_date,
        is_active: req.is_active,
        created_at: now.clone(),
        updated_at: now,
    };
    db::academic_years::insert(&mut tx, &year).await?;
    tx.commit().await?;

    info!(academic_year_id = %year.id, name = %year.name, "academic year created");
    Ok((StatusCode::CREATED, Json(year)))
}

async fn update_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateAcademicYearRequest>,
) -> Result<Json<AcademicYear>, AppError> {
    auth.require_admin()?;

    let mut tx = db::begin_write(&state.db).await?;
    let mut year = db::academic_years::find_by_id(&mut tx, &id)
        .await?
        .ok_or_else(|| AppError::not_found("academic year", &id))?;
    year.apply(req)?;
    if db::academic_years::name_taken(&mut tx, &year.name, Some(&id)).await? {
        return Err(AppError::BadRequest(format!("academic year '{}' already exists", year.name)));
    }
    year.updated_at = db::now();

    db::academic_years::update(&mut tx, &year).await?;
    tx.commit().await?;
    Ok(Json(year))
}

async fn delete_year(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;

    let mut tx = db::begin_write(&state.db).await?;
    let year = db::academic_years::find_by_id(&mut tx, &id)
        .await?
        .ok_or_else(|| AppError::not_found("academic year", &id))?;
    if let Some(dependents) = db::describe_dependents(&mut tx, &id, YEAR_DEPENDENTS).await? {
        return Err(AppError::BadRequest(format!(
            "cannot delete academic year '{}': it still has {}",
            year.name, dependents
        )));
    }
    db::academic_years::delete(&mut tx, &id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
