use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{ValidationError, parse_date, require_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub student_number: String,
    pub name: String,
    pub gender: Gender,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: StudentStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// A student row as listed under a class roster.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledStudent {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub student: Student,
    pub enrolled_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudentRequest {
    pub student_number: String,
    pub name: String,
    pub gender: Gender,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: Option<StudentStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub student_number: Option<String>,
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: Option<StudentStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentFilter {
    pub search: Option<String>,
    pub status: Option<StudentStatus>,
}

impl NewStudentRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("studentNumber", &self.student_number)?;
        require_text("name", &self.name)?;
        if let Some(birth_date) = &self.birth_date {
            parse_date("birthDate", birth_date)?;
        }
        Ok(())
    }
}

impl Student {
    pub fn apply(&mut self, req: UpdateStudentRequest) -> Result<(), ValidationError> {
        if let Some(student_number) = req.student_number {
            require_text("studentNumber", &student_number)?;
            self.student_number = student_number;
        }
        if let Some(name) = req.name {
            require_text("name", &name)?;
            self.name = name;
        }
        if let Some(gender) = req.gender {
            self.gender = gender;
        }
        if let Some(birth_date) = req.birth_date {
            parse_date("birthDate", &birth_date)?;
            self.birth_date = Some(birth_date);
        }
        if req.address.is_some() {
            self.address = req.address;
        }
        if req.phone.is_some() {
            self.phone = req.phone;
        }
        if req.email.is_some() {
            self.email = req.email;
        }
        if let Some(status) = req.status {
            self.status = status;
        }
        Ok(())
    }
}
