use sqlx::SqliteConnection;
use tracing::debug;

use super::references::{ensure_active_academic_year, ensure_major, ensure_teacher};
use crate::db;
use crate::error::AppError;
use crate::models::validation::require_text;
use crate::models::{ClassRoom, NewClassRequest, UpdateClassRequest, ValidationError};

pub fn check_capacity(capacity: i64) -> Result<(), AppError> {
    if capacity < 1 {
        return Err(AppError::BadRequest(format!(
            "capacity must be at least 1 (got {})",
            capacity
        )));
    }
    Ok(())
}

fn check_grade(grade: i64) -> Result<(), ValidationError> {
    if grade < 1 {
        return Err(ValidationError::Inconsistent {
            reason: format!("grade must be at least 1 (got {})", grade),
        });
    }
    Ok(())
}

pub async fn validate_new_class(
    conn: &mut SqliteConnection,
    req: &NewClassRequest,
) -> Result<(), AppError> {
    require_text("name", &req.name)?;
    check_grade(req.grade)?;
    check_capacity(req.capacity)?;
    ensure_teacher(conn, &req.teacher_id).await?;
    ensure_major(conn, &req.major_id).await?;
    ensure_active_academic_year(conn, &req.academic_year_id).await?;
    Ok(())
}

/// Only fields present in `req` are re-checked.
pub async fn validate_class_update(
    conn: &mut SqliteConnection,
    current: &ClassRoom,
    req: &UpdateClassRequest,
) -> Result<(), AppError> {
    if let Some(name) = &req.name {
        require_text("name", name)?;
    }
    if let Some(grade) = req.grade {
        check_grade(grade)?;
    }

    let enrolled = db::classes::enrolled_count(conn, &current.id).await?;
    if let Some(capacity) = req.capacity {
        check_capacity(capacity)?;
        if capacity < enrolled {
            return Err(AppError::BadRequest(format!(
                "capacity {} is below the {} student(s) already enrolled in '{}'",
                capacity, enrolled, current.name
            )));
        }
    }

    if let Some(teacher_id) = &req.teacher_id {
        ensure_teacher(conn, teacher_id).await?;
    }
    if let Some(major_id) = &req.major_id {
        ensure_major(conn, major_id).await?;
    }
    if let Some(academic_year_id) = &req.academic_year_id {
        ensure_active_academic_year(conn, academic_year_id).await?;
        if *academic_year_id != current.academic_year_id && enrolled > 0 {
            return Err(AppError::BadRequest(format!(
                "cannot move '{}' to another academic year while {} student(s) are enrolled",
                current.name, enrolled
            )));
        }
    }

    debug!(class_id = %current.id, "class update passed validation");
    Ok(())
}

const CLASS_DEPENDENTS: &[(&str, &str, &str)] = &[
    ("enrollments", "class_id", "enrolled student"),
    ("schedules", "class_id", "schedule"),
];

pub async fn ensure_class_deletable(
    conn: &mut SqliteConnection,
    class: &ClassRoom,
) -> Result<(), AppError> {
    if let Some(dependents) = db::describe_dependents(conn, &class.id, CLASS_DEPENDENTS).await? {
        return Err(AppError::BadRequest(format!(
            "cannot delete class '{}': it still has {}",
            class.name, dependents
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_must_be_positive() {
        assert!(check_capacity(1).is_ok());
        assert!(check_capacity(0).is_err());
        assert!(check_capacity(-5).is_err());
    }
}
