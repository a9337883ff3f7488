//! Validation error types and field checks shared by request models

use std::fmt;

use chrono::NaiveDate;

/// Validation error for request payloads
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., `HH:mm`)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Number outside of the accepted range
    OutOfRange { field: &'static str, min: f64, max: f64 },

    /// Cross-field rule violated (e.g., start must precede end)
    Inconsistent { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
            Self::Inconsistent { reason } => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

const MAX_TEXT_LEN: usize = 255;

/// Require a non-blank string of at most 255 characters.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong { field, max: MAX_TEXT_LEN });
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field,
        reason: "expected YYYY-MM-DD",
    })
}

pub fn require_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value < min || value > max || value.is_nan() {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong { field: "name", max: 255 };
        assert_eq!(err.to_string(), "name exceeds maximum length of 255 characters");

        let err = ValidationError::OutOfRange { field: "dayOfWeek", min: 1.0, max: 7.0 };
        assert_eq!(err.to_string(), "dayOfWeek must be between 1 and 7");
    }

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(require_text("name", "   "), Err(ValidationError::Empty { field: "name" }));
        assert!(require_text("name", "X-A").is_ok());
    }

    #[test]
    fn dates_must_be_iso() {
        assert!(parse_date("birthDate", "2010-02-28").is_ok());
        assert!(parse_date("birthDate", "28/02/2010").is_err());
        assert!(parse_date("birthDate", "2010-02-30").is_err());
    }
}
