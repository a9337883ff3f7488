use sqlx::SqliteConnection;

use crate::models::{EnrolledStudent, Enrollment};

/// The student's enrollment in any class belonging to `academic_year_id`,
/// paired with that class's name.
pub async fn find_in_academic_year(
    conn: &mut SqliteConnection,
    student_id: &str,
    academic_year_id: &str,
) -> Result<Option<(Enrollment, String)>, sqlx::Error> {
    let row = sqlx::query_as::<_, (String, String, String, String, String)>(
        r#"
        SELECT e.id, e.student_id, e.class_id, e.enrolled_at, c.name
        FROM enrollments e
        JOIN classes c ON c.id = e.class_id
        WHERE e.student_id = ?1 AND c.academic_year_id = ?2
        LIMIT 1
        "#,
    )
    .bind(student_id)
    .bind(academic_year_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(|(id, student_id, class_id, enrolled_at, class_name)| {
        (
            Enrollment {
                id,
                student_id,
                class_id,
                enrolled_at,
            },
            class_name,
        )
    }))
}

pub async fn insert(conn: &mut SqliteConnection, enrollment: &Enrollment) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO enrollments (id, student_id, class_id, enrolled_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&enrollment.id)
    .bind(&enrollment.student_id)
    .bind(&enrollment.class_id)
    .bind(&enrollment.enrolled_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete(
    conn: &mut SqliteConnection,
    class_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM enrollments WHERE class_id = ?1 AND student_id = ?2")
        .bind(class_id)
        .bind(student_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    Ok(result > 0)
}

pub async fn roster(
    conn: &mut SqliteConnection,
    class_id: &str,
) -> Result<Vec<EnrolledStudent>, sqlx::Error> {
    sqlx::query_as::<_, EnrolledStudent>(
        r#"
        SELECT s.id, s.student_number, s.name, s.gender, s.birth_date, s.address,
            s.phone, s.email, s.status, s.created_at, s.updated_at, e.enrolled_at
        FROM enrollments e
        JOIN students s ON s.id = e.student_id
        WHERE e.class_id = ?
        ORDER BY s.name ASC
        "#,
    )
    .bind(class_id)
    .fetch_all(&mut *conn)
    .await
}
