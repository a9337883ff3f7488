use sqlx::SqliteConnection;

use crate::models::{AcademicYear, Pagination};

const YEAR_COLUMNS: &str = "id, name, start_date, end_date, is_active, created_at, updated_at";

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<AcademicYear>, sqlx::Error> {
    sqlx::query_as::<_, AcademicYear>(&format!(
        "SELECT {} FROM academic_years WHERE id = ?",
        YEAR_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn name_taken(
    conn: &mut SqliteConnection,
    name: &str,
    exclude_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM academic_years WHERE name = ?1 AND id != ?2")
            .bind(name)
            .bind(exclude_id.unwrap_or(""))
            .fetch_one(&mut *conn)
            .await?;
    Ok(count > 0)
}

pub async fn list(
    conn: &mut SqliteConnection,
    page: Pagination,
) -> Result<(Vec<AcademicYear>, i64), sqlx::Error> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM academic_years")
        .fetch_one(&mut *conn)
        .await?;

    let years = sqlx::query_as::<_, AcademicYear>(&format!(
        "SELECT {} FROM academic_years ORDER BY start_date DESC LIMIT ? OFFSET ?",
        YEAR_COLUMNS
    ))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&mut *conn)
    .await?;

    Ok((years, total))
}

pub async fn insert(conn: &mut SqliteConnection, year: &AcademicYear) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO academic_years
            (id, name, start_date, end_date, is_active, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&year.id)
    .bind(&year.name)
    .bind(&year.start_date)
    .bind(&year.end_date)
    .bind(year.is_active)
    .bind(&year.created_at)
    .bind(&year.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn update(conn: &mut SqliteConnection, year: &AcademicYear) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE academic_years
        SET name = ?1,
            start_date = ?2,
            end_date = ?3,
            is_active = ?4,
            updated_at = ?5
        WHERE id = ?6
        "#,
    )
    .bind(&year.name)
    .bind(&year.start_date)
    .bind(&year.end_date)
    .bind(year.is_active)
    .bind(&year.updated_at)
    .bind(&year.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM academic_years WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    Ok(result > 0)
}
