use sqlx::SqliteConnection;

use super::references::{ensure_class, ensure_subject, ensure_teacher};
use crate::db::{self, schedules::Owner};
use crate::error::AppError;
use crate::models::{Schedule, TimeRange};

/// First schedule in `existing` whose time range overlaps `candidate`.
/// Rows with unparsable times are skipped.
pub fn find_conflict<'a>(candidate: &TimeRange, existing: &'a [Schedule]) -> Option<&'a Schedule> {
    existing.iter().find(|other| {
        other
            .time_range()
            .map(|range| candidate.overlaps(&range))
            .unwrap_or(false)
    })
}

/// Validate `candidate` as it would be stored. The row with `candidate.id`
/// is left out of the overlap scan, so the same call serves create and update.
pub async fn validate_schedule(
    conn: &mut SqliteConnection,
    candidate: &Schedule,
) -> Result<(), AppError> {
    let range = candidate.validate_fields()?;
    let class = ensure_class(conn, &candidate.class_id).await?;
    ensure_subject(conn, &candidate.subject_id).await?;
    let teacher = ensure_teacher(conn, &candidate.teacher_id).await?;

    if !candidate.status.is_active() {
        return Ok(());
    }

    let same_class = db::schedules::active_on_day(
        conn,
        Owner::Class(&candidate.class_id),
        candidate.day_of_week,
        &candidate.id,
    )
    .await?;
    if let Some(conflict) = find_conflict(&range, &same_class) {
        return Err(AppError::BadRequest(format!(
            "schedule conflict: class '{}' already has a lesson from {} to {} on day {}",
            class.name, conflict.start_time, conflict.end_time, conflict.day_of_week
        )));
    }

    let same_teacher = db::schedules::active_on_day(
        conn,
        Owner::Teacher(&candidate.teacher_id),
        candidate.day_of_week,
        &candidate.id,
    )
    .await?;
    if let Some(conflict) = find_conflict(&range, &same_teacher) {
        return Err(AppError::BadRequest(format!(
            "schedule conflict: teacher '{}' is already teaching from {} to {} on day {}",
            teacher.name, conflict.start_time, conflict.end_time, conflict.day_of_week
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    fn schedule(id: &str, start: &str, end: &str) -> Schedule {
        Schedule {
            id: id.to_string(),
            class_id: "c1".into(),
            subject_id: "s1".into(),
            teacher_id: "t1".into(),
            day_of_week: 1,
            start_time: start.into(),
            end_time: end.into(),
            room: None,
            status: Status::Active,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn finds_first_overlapping_row() {
        let existing = vec![
            schedule("a", "07:00", "08:00"),
            schedule("b", "09:00", "10:00"),
            schedule("c", "10:00", "11:00"),
        ];
        let candidate = TimeRange::parse("09:30", "10:30").unwrap();
        assert_eq!(find_conflict(&candidate, &existing).map(|s| s.id.as_str()), Some("b"));
    }

    #[test]
    fn back_to_back_is_free() {
        let existing = vec![schedule("a", "09:00", "10:00")];
        let candidate = TimeRange::parse("10:00", "11:00").unwrap();
        assert!(find_conflict(&candidate, &existing).is_none());
    }
}
