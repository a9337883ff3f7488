use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::models::{Pagination, Schedule, ScheduleFilter};

const SCHEDULE_COLUMNS: &str = "id, class_id, subject_id, teacher_id, day_of_week, start_time, \
     end_time, room, status, created_at, updated_at";

/// Whose timetable an overlap scan looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner<'a> {
    Class(&'a str),
    Teacher(&'a str),
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: &str) -> Result<Option<Schedule>, sqlx::Error> {
    sqlx::query_as::<_, Schedule>(&format!("SELECT {} FROM schedules WHERE id = ?", SCHEDULE_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Active schedules of a class or teacher on `day_of_week`, excluding `exclude_id`.
pub async fn active_on_day(
    conn: &mut SqliteConnection,
    owner: Owner<'_>,
    day_of_week: i64,
    exclude_id: &str,
) -> Result<Vec<Schedule>, sqlx::Error> {
    let (column, owner_id) = match owner {
        Owner::Class(id) => ("class_id", id),
        Owner::Teacher(id) => ("teacher_id", id),
    };
    sqlx::query_as::<_, Schedule>(&format!(
        "SELECT {} FROM schedules \
         WHERE {} = ?1 AND day_of_week = ?2 AND status = 'active' AND id != ?3 \
         ORDER BY start_time ASC",
        SCHEDULE_COLUMNS, column
    ))
    .bind(owner_id)
    .bind(day_of_week)
    .bind(exclude_id)
    .fetch_all(&mut *conn)
    .await
}

fn push_filter<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a ScheduleFilter) {
    if let Some(class_id) = &filter.class_id {
        qb.push(" AND class_id = ").push_bind(class_id);
    }
    if let Some(teacher_id) = &filter.teacher_id {
        qb.push(" AND teacher_id = ").push_bind(teacher_id);
    }
    if let Some(day_of_week) = filter.day_of_week {
        qb.push(" AND day_of_week = ").push_bind(day_of_week);
    }
}

pub async fn list(
    conn: &mut SqliteConnection,
    filter: &ScheduleFilter,
    page: Pagination,
) -> Result<(Vec<Schedule>, i64), sqlx::Error> {
    let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM schedules WHERE 1 = 1");
    push_filter(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar::<i64>().fetch_one(&mut *conn).await?;

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {} FROM schedules WHERE 1 = 1",
        SCHEDULE_COLUMNS
    ));
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY day_of_week ASC, start_time ASC LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
    let schedules = qb.build_query_as::<Schedule>().fetch_all(&mut *conn).await?;

    Ok((schedules, total))
}

pub async fn insert(conn: &mut SqliteConnection, schedule: &Schedule) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO schedules
            (id, class_id, subject_id, teacher_id, day_of_week, start_time, end_time,
            room, status, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&schedule.id)
    .bind(&schedule.class_id)
    .bind(&schedule.subject_id)
    .bind(&schedule.teacher_id)
    .bind(schedule.day_of_week)
    .bind(&schedule.start_time)
    .bind(&schedule.end_time)
    .bind(&schedule.room)
    .bind(schedule.status)
    .bind(&schedule.created_at)
    .bind(&schedule.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn update(conn: &mut SqliteConnection, schedule: &Schedule) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE schedules
        SET class_id = ?1,
            subject_id = ?2,
            teacher_id = ?3,
            day_of_week = ?4,
            start_time = ?5,
            end_time = ?6,
            room = ?7,
            status = ?8,
            updated_at = ?9
        WHERE id = ?10
        "#,
    )
    .bind(&schedule.class_id)
    .bind(&schedule.subject_id)
    .bind(&schedule.teacher_id)
    .bind(schedule.day_of_week)
    .bind(&schedule.start_time)
    .bind(&schedule.end_time)
    .bind(&schedule.room)
    .bind(schedule.status)
    .bind(&schedule.updated_at)
    .bind(&schedule.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM schedules WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    Ok(result > 0)
}
