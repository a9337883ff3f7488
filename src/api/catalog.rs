use axum::extract::{Extension, Path, Query};
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use tracing::info;

use crate::auth::AuthUser;
use crate::db::{self, catalog::Catalog};
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

/// CRUD routes for one catalog table mounted at `base`.
pub fn routes(catalog: Catalog, base: &str) -> Router<AppState> {
    Router::new()
        .route(base, get(list_entries).post(create_entry))
        .route(
            &format!("{}/{{id}}", base),
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .layer(Extension(catalog))
}

async fn list_entries(
    State(state): State<AppState>,
    Extension(catalog): Extension<Catalog>,
    _auth: AuthUser,
    Query(page): Query<PaginationParams>,
) -> Result<Json<Paginated<CatalogEntry>>, AppError> {
    let page = Pagination::from(&page);
    let mut conn = state.db.acquire().await?;
    let (entries, total) = db::catalog::list(&mut conn, catalog, page).await?;
    Ok(Json(Paginated::new(entries, total, page)))
}

async fn get_entry(
    State(state): State<AppState>,
    Extension(catalog): Extension<Catalog>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<CatalogEntry>, AppError> {
    let mut conn = state.db.acquire().await?;
    let entry = db::catalog::find_by_id(&mut conn, catalog, &id)
        .await?
        .ok_or_else(|| AppError::not_found(catalog.label(), &id))?;
    Ok(Json(entry))
}

async fn create_entry(
    State(state): State<AppState>,
    Extension(catalog): Extension<Catalog>,
    auth: AuthUser,
    Json(req): Json<NewCatalogEntryRequest>,
) -> Result<(StatusCode, Json<CatalogEntry>), AppError> {
    auth.require_admin()?;
    req.validate()?;

    let mut tx = db::begin_write(&state.db).await?;
    if db::catalog::code_taken(&mut tx, catalog, &req.code, None).await? {
        return Err(AppError::BadRequest(format!(
            "{} code '{}' is already in use",
            catalog.label(),
            req.code
        )));
    }

    let now = db::now();
    let entry = CatalogEntry {
        id: db::new_id(),
        code: req.code,
        name: req.name,
        description: req.description,
        created_at: now.clone(),
        updated_at: now,
    };
    db::catalog::insert(&mut tx, catalog, &entry).await?;
    tx.commit().await?;

    info!(id = %entry.id, code = %entry.code, "{} created", catalog.label());
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_entry(
    State(state): State<AppState>,
    Extension(catalog): Extension<Catalog>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateCatalogEntryRequest>,
) -> Result<Json<CatalogEntry>, AppError> {
    auth.require_admin()?;

    let mut tx = db::begin_write(&state.db).await?;
    let mut entry = db::catalog::find_by_id(&mut tx, catalog, &id)
        .await?
        .ok_or_else(|| AppError::not_found(catalog.label(), &id))?;
    entry.apply(req)?;
    if db::catalog::code_taken(&mut tx, catalog, &entry.code, Some(&id)).await? {
        return Err(AppError::BadRequest(format!(
            "{} code '{}' is already in use",
            catalog.label(),
            entry.code
        )));
    }
    entry.updated_at = db::now();

    db::catalog::update(&mut tx, catalog, &entry).await?;
    tx.commit().await?;
    Ok(Json(entry))
}

async fn delete_entry(
    State(state): State<AppState>,
    Extension(catalog): Extension<Catalog>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;

    let mut tx = db::begin_write(&state.db).await?;
    let entry = db::catalog::find_by_id(&mut tx, catalog, &id)
        .await?
        .ok_or_else(|| AppError::not_found(catalog.label(), &id))?;
    if let Some(dependents) = db::describe_dependents(&mut tx, &id, catalog.dependents()).await? {
        return Err(AppError::BadRequest(format!(
            "cannot delete {} '{}': it is still used by {}",
            catalog.label(),
            entry.name,
            dependents
        )));
    }
    db::catalog::delete(&mut tx, catalog, &id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
