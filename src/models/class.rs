use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Status;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClassRoom {
    pub id: String,
    pub name: String,
    pub grade: i64,
    pub major_id: String,
    pub teacher_id: String,
    pub academic_year_id: String,
    pub capacity: i64,
    pub status: Status,
    pub created_at: String,
    pub updated_at: String,
}

/// A class together with its current head count.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClassView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub class: ClassRoom,
    pub enrolled_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClassRequest {
    pub name: String,
    pub grade: i64,
    pub major_id: String,
    pub teacher_id: String,
    pub academic_year_id: String,
    pub capacity: i64,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub grade: Option<i64>,
    pub major_id: Option<String>,
    pub teacher_id: Option<String>,
    pub academic_year_id: Option<String>,
    pub capacity: Option<i64>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFilter {
    pub academic_year_id: Option<String>,
    pub teacher_id: Option<String>,
    pub major_id: Option<String>,
}

impl ClassRoom {
    /// Overwrite the fields present in `req`. Rules are checked separately.
    pub fn merge(&mut self, req: &UpdateClassRequest) {
        if let Some(name) = &req.name {
            self.name = name.clone();
        }
        if let Some(grade) = req.grade {
            self.grade = grade;
        }
        if let Some(major_id) = &req.major_id {
            self.major_id = major_id.clone();
        }
        if let Some(teacher_id) = &req.teacher_id {
            self.teacher_id = teacher_id.clone();
        }
        if let Some(academic_year_id) = &req.academic_year_id {
            self.academic_year_id = academic_year_id.clone();
        }
        if let Some(capacity) = req.capacity {
            self.capacity = capacity;
        }
        if let Some(status) = req.status {
            self.status = status;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    pub student_id: String,
    pub class_id: String,
    pub enrolled_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub student_id: String,
}
