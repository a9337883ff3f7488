//! SQLite persistence. Every query takes an explicit connection so callers
//! decide whether it runs on a pooled connection or inside a transaction.

pub mod academic_years;
pub mod catalog;
pub mod classes;
pub mod enrollments;
pub mod records;
pub mod schedules;
pub mod students;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use uuid::Uuid;

use crate::error::AppError;

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    // An in-memory database lives only as long as its connection.
    if database_url.contains(":memory:") {
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }
    let pool = pool_options.connect_with(options).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Open a transaction that takes the write lock up front. Concurrent writers
/// queue on the busy timeout instead of failing when they upgrade a read.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn now() -> String {
    Utc::now().to_rfc3339()
}

/// Count rows of `table` whose `column` equals `id`.
///
/// Table and column names are compile-time constants supplied by callers.
pub async fn count_referencing(
    conn: &mut SqliteConnection,
    table: &'static str,
    column: &'static str,
    id: &str,
) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?", table, column);
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(id)
        .fetch_one(&mut *conn)
        .await
}

/// Describe rows that still reference an entity, e.g. `"3 enrollment(s), 1 schedule(s)"`.
/// Returns `None` when nothing references it.
pub async fn describe_dependents(
    conn: &mut SqliteConnection,
    id: &str,
    refs: &[(&'static str, &'static str, &'static str)],
) -> Result<Option<String>, sqlx::Error> {
    let mut parts = Vec::new();
    for &(table, column, label) in refs {
        let count = count_referencing(conn, table, column, id).await?;
        if count > 0 {
            parts.push(format!("{} {}(s)", count, label));
        }
    }
    Ok(if parts.is_empty() { None } else { Some(parts.join(", ")) })
}
