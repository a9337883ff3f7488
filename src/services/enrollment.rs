use sqlx::SqliteConnection;
use tracing::info;

use crate::db;
use crate::error::AppError;
use crate::models::{ClassRoom, Enrollment, StudentStatus};

/// A student may join `class` only if the class is active and has a free
/// seat, and the student is active and not yet enrolled anywhere in the
/// class's academic year.
pub async fn validate_enrollment(
    conn: &mut SqliteConnection,
    class: &ClassRoom,
    student_id: &str,
) -> Result<(), AppError> {
    let student = db::students::find_by_id(conn, student_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("student '{}' does not exist", student_id)))?;
    if student.status != StudentStatus::Active {
        return Err(AppError::BadRequest(format!(
            "student '{}' is not active",
            student.name
        )));
    }
    if !class.status.is_active() {
        return Err(AppError::BadRequest(format!("class '{}' is inactive", class.name)));
    }

    if let Some((existing, class_name)) =
        db::enrollments::find_in_academic_year(conn, student_id, &class.academic_year_id).await?
    {
        let reason = if existing.class_id == class.id {
            format!("student '{}' is already enrolled in '{}'", student.name, class_name)
        } else {
            format!(
                "student '{}' is already enrolled in '{}' for this academic year",
                student.name, class_name
            )
        };
        return Err(AppError::BadRequest(reason));
    }

    let enrolled = db::classes::enrolled_count(conn, &class.id).await?;
    if enrolled >= class.capacity {
        return Err(AppError::BadRequest(format!(
            "class '{}' is full ({}/{})",
            class.name, enrolled, class.capacity
        )));
    }

    Ok(())
}

/// Validate and insert on the same connection; run it on a transaction.
pub async fn enroll(
    conn: &mut SqliteConnection,
    class: &ClassRoom,
    student_id: &str,
) -> Result<Enrollment, AppError> {
    validate_enrollment(conn, class, student_id).await?;

    let enrollment = Enrollment {
        id: db::new_id(),
        student_id: student_id.to_string(),
        class_id: class.id.clone(),
        enrolled_at: db::now(),
    };
    db::enrollments::insert(conn, &enrollment).await?;

    info!(class_id = %class.id, student_id, "student enrolled");
    Ok(enrollment)
}
