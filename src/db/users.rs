use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::models::{Pagination, Role, User};

const USER_COLUMNS: &str =
    "id, username, password_hash, role, name, email, status, created_at, updated_at";

pub async fn find_by_id(conn: &mut SqliteConnection, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn find_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS))
        .bind(username)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn username_taken(
    conn: &mut SqliteConnection,
    username: &str,
    exclude_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1 AND id != ?2")
        .bind(username)
        .bind(exclude_id.unwrap_or(""))
        .fetch_one(&mut *conn)
        .await?;
    Ok(count > 0)
}

pub async fn count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await
}

fn push_filter<'a>(qb: &mut QueryBuilder<'a, Sqlite>, role: Option<Role>) {
    if let Some(role) = role {
        qb.push(" AND role = ").push_bind(role);
    }
}

pub async fn list(
    conn: &mut SqliteConnection,
    role: Option<Role>,
    page: Pagination,
) -> Result<(Vec<User>, i64), sqlx::Error> {
    let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM users WHERE 1 = 1");
    push_filter(&mut count_qb, role);
    let total: i64 = count_qb.build_query_scalar::<i64>().fetch_one(&mut *conn).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM users WHERE 1 = 1", USER_COLUMNS));
    push_filter(&mut qb, role);
    qb.push(" ORDER BY name ASC LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
    let users = qb.build_query_as::<User>().fetch_all(&mut *conn).await?;

    Ok((users, total))
}

pub async fn insert(conn: &mut SqliteConnection, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users
            (id, username, password_hash, role, name, email, status, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.status)
    .bind(&user.created_at)
    .bind(&user.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn update(conn: &mut SqliteConnection, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET username = ?1,
            password_hash = ?2,
            role = ?3,
            name = ?4,
            email = ?5,
            status = ?6,
            updated_at = ?7
        WHERE id = ?8
        "#,
    )
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.status)
    .bind(&user.updated_at)
    .bind(&user.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    Ok(result > 0)
}
