//! Majors and subjects share one table layout; `Catalog` picks the table.

use sqlx::SqliteConnection;

use crate::models::{CatalogEntry, Pagination};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Majors,
    Subjects,
}

impl Catalog {
    pub fn table(self) -> &'static str {
        match self {
            Catalog::Majors => "majors",
            Catalog::Subjects => "subjects",
        }
    }

    /// Singular name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Catalog::Majors => "major",
            Catalog::Subjects => "subject",
        }
    }

    /// Rows that must be gone before an entry can be deleted.
    pub fn dependents(self) -> &'static [(&'static str, &'static str, &'static str)] {
        match self {
            Catalog::Majors => &[("classes", "major_id", "class")],
            Catalog::Subjects => &[
                ("schedules", "subject_id", "schedule"),
                ("academic_records", "subject_id", "academic record"),
            ],
        }
    }
}

const ENTRY_COLUMNS: &str = "id, code, name, description, created_at, updated_at";

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    catalog: Catalog,
    id: &str,
) -> Result<Option<CatalogEntry>, sqlx::Error> {
    sqlx::query_as::<_, CatalogEntry>(&format!(
        "SELECT {} FROM {} WHERE id = ?",
        ENTRY_COLUMNS,
        catalog.table()
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn code_taken(
    conn: &mut SqliteConnection,
    catalog: Catalog,
    code: &str,
    exclude_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {} WHERE code = ?1 AND id != ?2",
        catalog.table()
    ))
    .bind(code)
    .bind(exclude_id.unwrap_or(""))
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}

pub async fn list(
    conn: &mut SqliteConnection,
    catalog: Catalog,
    page: Pagination,
) -> Result<(Vec<CatalogEntry>, i64), sqlx::Error> {
    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", catalog.table()))
        .fetch_one(&mut *conn)
        .await?;

    let entries = sqlx::query_as::<_, CatalogEntry>(&format!(
        "SELECT {} FROM {} ORDER BY code ASC LIMIT ? OFFSET ?",
        ENTRY_COLUMNS,
        catalog.table()
    ))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&mut *conn)
    .await?;

    Ok((entries, total))
}

pub async fn insert(
    conn: &mut SqliteConnection,
    catalog: Catalog,
    entry: &CatalogEntry,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "INSERT INTO {} (id, code, name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        catalog.table()
    ))
    .bind(&entry.id)
    .bind(&entry.code)
    .bind(&entry.name)
    .bind(&entry.description)
    .bind(&entry.created_at)
    .bind(&entry.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn update(
    conn: &mut SqliteConnection,
    catalog: Catalog,
    entry: &CatalogEntry,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "UPDATE {} SET code = ?1, name = ?2, description = ?3, updated_at = ?4 WHERE id = ?5",
        catalog.table()
    ))
    .bind(&entry.code)
    .bind(&entry.name)
    .bind(&entry.description)
    .bind(&entry.updated_at)
    .bind(&entry.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete(
    conn: &mut SqliteConnection,
    catalog: Catalog,
    id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", catalog.table()))
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    Ok(result > 0)
}
