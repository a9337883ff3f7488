use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::models::{ClassFilter, ClassRoom, ClassView, Pagination};

const CLASS_COLUMNS: &str = "c.id, c.name, c.grade, c.major_id, c.teacher_id, c.academic_year_id, \
     c.capacity, c.status, c.created_at, c.updated_at";

const ENROLLED_COUNT: &str =
    "(SELECT COUNT(*) FROM enrollments e WHERE e.class_id = c.id) AS enrolled_count";

pub async fn find_by_id(conn: &mut SqliteConnection, id: &str) -> Result<Option<ClassRoom>, sqlx::Error> {
    sqlx::query_as::<_, ClassRoom>(&format!("SELECT {} FROM classes c WHERE c.id = ?", CLASS_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn find_view(conn: &mut SqliteConnection, id: &str) -> Result<Option<ClassView>, sqlx::Error> {
    sqlx::query_as::<_, ClassView>(&format!(
        "SELECT {}, {} FROM classes c WHERE c.id = ?",
        CLASS_COLUMNS, ENROLLED_COUNT
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn enrolled_count(conn: &mut SqliteConnection, class_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE class_id = ?")
        .bind(class_id)
        .fetch_one(&mut *conn)
        .await
}

fn push_filter<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a ClassFilter) {
    if let Some(academic_year_id) = &filter.academic_year_id {
        qb.push(" AND c.academic_year_id = ").push_bind(academic_year_id);
    }
    if let Some(teacher_id) = &filter.teacher_id {
        qb.push(" AND c.teacher_id = ").push_bind(teacher_id);
    }
    if let Some(major_id) = &filter.major_id {
        qb.push(" AND c.major_id = ").push_bind(major_id);
    }
}

pub async fn list(
    conn: &mut SqliteConnection,
    filter: &ClassFilter,
    page: Pagination,
) -> Result<(Vec<ClassView>, i64), sqlx::Error> {
    let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM classes c WHERE 1 = 1");
    push_filter(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar::<i64>().fetch_one(&mut *conn).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {}, {} FROM classes c WHERE 1 = 1",
        CLASS_COLUMNS, ENROLLED_COUNT
    ));
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY c.grade ASC, c.name ASC LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
    let classes = qb.build_query_as::<ClassView>().fetch_all(&mut *conn).await?;

    Ok((classes, total))
}

pub async fn insert(conn: &mut SqliteConnection, class: &ClassRoom) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO classes
            (id, name, grade, major_id, teacher_id, academic_year_id, capacity,
            status, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&class.id)
    .bind(&class.name)
    .bind(class.grade)
    .bind(&class.major_id)
    .bind(&class.teacher_id)
    .bind(&class.academic_year_id)
    .bind(class.capacity)
    .bind(class.status)
    .bind(&class.created_at)
    .bind(&class.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn update(conn: &mut SqliteConnection, class: &ClassRoom) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE classes
        SET name = ?1,
            grade = ?2,
            major_id = ?3,
            teacher_id = ?4,
            academic_year_id = ?5,
            capacity = ?6,
            status = ?7,
            updated_at = ?8
        WHERE id = ?9
        "#,
    )
    .bind(&class.name)
    .bind(class.grade)
    .bind(&class.major_id)
    .bind(&class.teacher_id)
    .bind(&class.academic_year_id)
    .bind(class.capacity)
    .bind(class.status)
    .bind(&class.updated_at)
    .bind(&class.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM classes WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    Ok(result > 0)
}
