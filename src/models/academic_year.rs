use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{ValidationError, parse_date, require_text};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYear {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAcademicYearRequest {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAcademicYearRequest {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_active: Option<bool>,
}

/// Both bounds must parse and the term must not be empty.
pub fn validate_term(start_date: &str, end_date: &str) -> Result<(), ValidationError> {
    let start = parse_date("startDate", start_date)?;
    let end = parse_date("endDate", end_date)?;
    if start >= end {
        return Err(ValidationError::Inconsistent {
            reason: "startDate must be before endDate".to_string(),
        });
    }
    Ok(())
}

impl NewAcademicYearRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        validate_term(&self.start_date, &self.end_date)
    }
}

impl AcademicYear {
    /// Merge a partial update into this row, validating the result.
    pub fn apply(&mut self, req: UpdateAcademicYearRequest) -> Result<(), ValidationError> {
        if let Some(name) = req.name {
            require_text("name", &name)?;
            self.name = name;
        }
        if let Some(start_date) = req.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = req.end_date {
            self.end_date = end_date;
        }
        if let Some(is_active) = req.is_active {
            self.is_active = is_active;
        }
        validate_term(&self.start_date, &self.end_date)
    }
}
