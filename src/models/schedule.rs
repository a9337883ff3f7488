use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Status;
use super::validation::{ValidationError, require_range};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub class_id: String,
    pub subject_id: String,
    pub teacher_id: String,
    /// 1 = Monday .. 7 = Sunday
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub status: Status,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduleRequest {
    pub class_id: String,
    pub subject_id: String,
    pub teacher_id: String,
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    pub class_id: Option<String>,
    pub subject_id: Option<String>,
    pub teacher_id: Option<String>,
    pub day_of_week: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<String>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleFilter {
    pub class_id: Option<String>,
    pub teacher_id: Option<String>,
    pub day_of_week: Option<i64>,
}

/// Parse a strict `HH:mm` clock time (hour 00-23, minute 00-59).
pub fn parse_clock(field: &'static str, value: &str) -> Result<NaiveTime, ValidationError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && bytes[..2].iter().chain(&bytes[3..]).all(u8::is_ascii_digit);
    if !well_formed {
        return Err(ValidationError::InvalidFormat { field, reason: "expected HH:mm" });
    }

    let hour: u32 = value[..2].parse().unwrap_or(u32::MAX);
    let minute: u32 = value[3..].parse().unwrap_or(u32::MAX);
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(ValidationError::InvalidFormat {
        field,
        reason: "hour must be 00-23 and minute 00-59",
    })
}

/// Half-open time interval `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        let start = parse_clock("startTime", start)?;
        let end = parse_clock("endTime", end)?;
        if start >= end {
            return Err(ValidationError::Inconsistent {
                reason: "startTime must be before endTime".to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Ranges that merely touch (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl Schedule {
    pub fn time_range(&self) -> Result<TimeRange, ValidationError> {
        TimeRange::parse(&self.start_time, &self.end_time)
    }

    /// Field-level checks: day of week and the time window.
    pub fn validate_fields(&self) -> Result<TimeRange, ValidationError> {
        require_range("dayOfWeek", self.day_of_week as f64, 1.0, 7.0)?;
        self.time_range()
    }

    pub fn merge(&mut self, req: UpdateScheduleRequest) {
        if let Some(class_id) = req.class_id {
            self.class_id = class_id;
        }
        if let Some(subject_id) = req.subject_id {
            self.subject_id = subject_id;
        }
        if let Some(teacher_id) = req.teacher_id {
            self.teacher_id = teacher_id;
        }
        if let Some(day_of_week) = req.day_of_week {
            self.day_of_week = day_of_week;
        }
        if let Some(start_time) = req.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = req.end_time {
            self.end_time = end_time;
        }
        if req.room.is_some() {
            self.room = req.room;
        }
        if let Some(status) = req.status {
            self.status = status;
        }
    }
}
