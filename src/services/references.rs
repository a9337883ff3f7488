use sqlx::SqliteConnection;

use crate::db::{self, catalog::Catalog};
use crate::error::AppError;
use crate::models::{AcademicYear, ClassRoom, Role, User};

/// `teacher_id` must name an active user whose role is teacher.
pub async fn ensure_teacher(conn: &mut SqliteConnection, teacher_id: &str) -> Result<User, AppError> {
    let user = db::users::find_by_id(conn, teacher_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("teacher '{}' does not exist", teacher_id)))?;
    if user.role != Role::Teacher {
        return Err(AppError::BadRequest(format!(
            "user '{}' is not a teacher (role: {})",
            user.username,
            user.role.as_str()
        )));
    }
    if !user.status.is_active() {
        return Err(AppError::BadRequest(format!(
            "teacher '{}' is inactive",
            user.username
        )));
    }
    Ok(user)
}

pub async fn ensure_major(conn: &mut SqliteConnection, major_id: &str) -> Result<(), AppError> {
    ensure_catalog_entry(conn, Catalog::Majors, major_id).await
}

pub async fn ensure_subject(conn: &mut SqliteConnection, subject_id: &str) -> Result<(), AppError> {
    ensure_catalog_entry(conn, Catalog::Subjects, subject_id).await
}

async fn ensure_catalog_entry(
    conn: &mut SqliteConnection,
    catalog: Catalog,
    id: &str,
) -> Result<(), AppError> {
    match db::catalog::find_by_id(conn, catalog, id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::BadRequest(format!("{} '{}' does not exist", catalog.label(), id))),
    }
}

pub async fn ensure_academic_year(
    conn: &mut SqliteConnection,
    academic_year_id: &str,
) -> Result<AcademicYear, AppError> {
    db::academic_years::find_by_id(conn, academic_year_id)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest(format!("academic year '{}' does not exist", academic_year_id))
        })
}

pub async fn ensure_active_academic_year(
    conn: &mut SqliteConnection,
    academic_year_id: &str,
) -> Result<AcademicYear, AppError> {
    let year = ensure_academic_year(conn, academic_year_id).await?;
    if !year.is_active {
        return Err(AppError::BadRequest(format!(
            "academic year '{}' is not active",
            year.name
        )));
    }
    Ok(year)
}

pub async fn ensure_class(conn: &mut SqliteConnection, class_id: &str) -> Result<ClassRoom, AppError> {
    db::classes::find_by_id(conn, class_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("class '{}' does not exist", class_id)))
}
