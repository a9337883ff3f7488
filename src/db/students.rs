use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::models::{Pagination, Student, StudentFilter};

const STUDENT_COLUMNS: &str = "id, student_number, name, gender, birth_date, address, phone, \
     email, status, created_at, updated_at";

pub async fn find_by_id(conn: &mut SqliteConnection, id: &str) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {} FROM students WHERE id = ?", STUDENT_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn number_taken(
    conn: &mut SqliteConnection,
    student_number: &str,
    exclude_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE student_number = ?1 AND id != ?2")
            .bind(student_number)
            .bind(exclude_id.unwrap_or(""))
            .fetch_one(&mut *conn)
            .await?;
    Ok(count > 0)
}

fn push_filter<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a StudentFilter) {
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        qb.push(" AND (name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR student_number LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
}

pub async fn list(
    conn: &mut SqliteConnection,
    filter: &StudentFilter,
    page: Pagination,
) -> Result<(Vec<Student>, i64), sqlx::Error> {
    let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM students WHERE 1 = 1");
    push_filter(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar::<i64>().fetch_one(&mut *conn).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {} FROM students WHERE 1 = 1",
        STUDENT_COLUMNS
    ));
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY name ASC LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
    let students = qb.build_query_as::<Student>().fetch_all(&mut *conn).await?;

    Ok((students, total))
}

pub async fn insert(conn: &mut SqliteConnection, student: &Student) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO students
            (id, student_number, name, gender, birth_date, address, phone, email,
            status, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&student.id)
    .bind(&student.student_number)
    .bind(&student.name)
    .bind(student.gender)
    .bind(&student.birth_date)
    .bind(&student.address)
    .bind(&student.phone)
    .bind(&student.email)
    .bind(student.status)
    .bind(&student.created_at)
    .bind(&student.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn update(conn: &mut SqliteConnection, student: &Student) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE students
        SET student_number = ?1,
            name = ?2,
            gender = ?3,
            birth_date = ?4,
            address = ?5,
            phone = ?6,
            email = ?7,
            status = ?8,
            updated_at = ?9
        WHERE id = ?10
        "#,
    )
    .bind(&student.student_number)
    .bind(&student.name)
    .bind(student.gender)
    .bind(&student.birth_date)
    .bind(&student.address)
    .bind(&student.phone)
    .bind(&student.email)
    .bind(student.status)
    .bind(&student.updated_at)
    .bind(&student.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    Ok(result > 0)
}
