use sqlx::SqliteConnection;

use crate::models::{AcademicRecord, Attendance, Guardian};

pub async fn attendance_exists(
    conn: &mut SqliteConnection,
    student_id: &str,
    date: &str,
) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE student_id = ?1 AND date = ?2")
            .bind(student_id)
            .bind(date)
            .fetch_one(&mut *conn)
            .await?;
    Ok(count > 0)
}

pub async fn insert_attendance(
    conn: &mut SqliteConnection,
    attendance: &Attendance,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO attendance (id, student_id, date, status, notes, recorded_by, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&attendance.id)
    .bind(&attendance.student_id)
    .bind(&attendance.date)
    .bind(attendance.status)
    .bind(&attendance.notes)
    .bind(&attendance.recorded_by)
    .bind(&attendance.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn list_attendance(
    conn: &mut SqliteConnection,
    student_id: &str,
) -> Result<Vec<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, student_id, date, status, notes, recorded_by, created_at
        FROM attendance
        WHERE student_id = ?
        ORDER BY date DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn academic_record_exists(
    conn: &mut SqliteConnection,
    student_id: &str,
    subject_id: &str,
    academic_year_id: &str,
    semester: i64,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM academic_records
        WHERE student_id = ?1 AND subject_id = ?2 AND academic_year_id = ?3 AND semester = ?4
        "#,
    )
    .bind(student_id)
    .bind(subject_id)
    .bind(academic_year_id)
    .bind(semester)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}

pub async fn insert_academic_record(
    conn: &mut SqliteConnection,
    record: &AcademicRecord,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO academic_records
            (id, student_id, subject_id, academic_year_id, semester, score, notes,
            recorded_by, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&record.id)
    .bind(&record.student_id)
    .bind(&record.subject_id)
    .bind(&record.academic_year_id)
    .bind(record.semester)
    .bind(record.score)
    .bind(&record.notes)
    .bind(&record.recorded_by)
    .bind(&record.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn list_academic_records(
    conn: &mut SqliteConnection,
    student_id: &str,
) -> Result<Vec<AcademicRecord>, sqlx::Error> {
    sqlx::query_as::<_, AcademicRecord>(
        r#"
        SELECT id, student_id, subject_id, academic_year_id, semester, score, notes,
            recorded_by, created_at
        FROM academic_records
        WHERE student_id = ?
        ORDER BY academic_year_id, semester, subject_id
        "#,
    )
    .bind(student_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn insert_guardian(conn: &mut SqliteConnection, guardian: &Guardian) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO guardians
            (id, student_id, name, relationship, phone, email, occupation, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&guardian.id)
    .bind(&guardian.student_id)
    .bind(&guardian.name)
    .bind(guardian.relationship)
    .bind(&guardian.phone)
    .bind(&guardian.email)
    .bind(&guardian.occupation)
    .bind(&guardian.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn list_guardians(
    conn: &mut SqliteConnection,
    student_id: &str,
) -> Result<Vec<Guardian>, sqlx::Error> {
    sqlx::query_as::<_, Guardian>(
        r#"
        SELECT id, student_id, name, relationship, phone, email, occupation, created_at
        FROM guardians
        WHERE student_id = ?
        ORDER BY created_at ASC
        "#,
    )
    .bind(student_id)
    .fetch_all(&mut *conn)
    .await
}
