//! Child records owned by a student: attendance, grades and guardians.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{ValidationError, parse_date, require_range, require_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: String,
    pub student_id: String,
    pub date: String,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub recorded_by: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAttendanceRequest {
    pub date: String,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

impl NewAttendanceRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        parse_date("date", &self.date).map(|_| ())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AcademicRecord {
    pub id: String,
    pub student_id: String,
    pub subject_id: String,
    pub academic_year_id: String,
    pub semester: i64,
    pub score: f64,
    pub notes: Option<String>,
    pub recorded_by: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAcademicRecordRequest {
    pub subject_id: String,
    pub academic_year_id: String,
    pub semester: i64,
    pub score: f64,
    pub notes: Option<String>,
}

impl NewAcademicRecordRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !matches!(self.semester, 1 | 2) {
            return Err(ValidationError::OutOfRange { field: "semester", min: 1.0, max: 2.0 });
        }
        require_range("score", self.score, 0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Relationship {
    Father,
    Mother,
    Guardian,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Guardian {
    pub id: String,
    pub student_id: String,
    pub name: String,
    pub relationship: Relationship,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub occupation: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGuardianRequest {
    pub name: String,
    pub relationship: Relationship,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub occupation: Option<String>,
}

impl NewGuardianRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}
