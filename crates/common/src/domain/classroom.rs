//! Classroom setup and settings

use crate::errors::{AppError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidateEmail};

const USERNAME_MAX: usize = 20;
const USERNAME_MIN: usize = 3;

/// First-run classroom creation form
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomSetup {
    #[serde(alias = "name", deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 100, message = "Classroom name is required"))]
    pub classroom_name: String,

    /// Public username; derived from the classroom name when empty
    #[serde(default)]
    pub username: String,

    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 32, message = "Grade level is required"))]
    pub grade_level: String,

    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 32, message = "Academic year is required"))]
    pub academic_year: String,

    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 100, message = "Teacher name is required"))]
    pub teacher_name: String,

    #[serde(default, deserialize_with = "super::empty_as_none")]
    #[validate(email(message = "Invalid teacher email"))]
    pub teacher_email: Option<String>,

    #[serde(default, deserialize_with = "super::empty_as_none")]
    #[validate(length(max = 32))]
    pub teacher_phone: Option<String>,
}

/// Editable classroom fields; the username never changes after setup
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ClassroomSettings {
    #[serde(default, deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 1, max = 32))]
    pub grade_level: Option<String>,

    #[serde(default, deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 1, max = 32))]
    pub academic_year: Option<String>,

    #[serde(default, deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 1, max = 100))]
    pub teacher_name: Option<String>,

    /// An empty string clears the stored email
    pub teacher_email: Option<String>,

    /// An empty string clears the stored phone
    #[validate(length(max = 32))]
    pub teacher_phone: Option<String>,
}

impl ClassroomSettings {
    /// Field checks beyond the derive: a non-blank email must be well formed
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if let Some(email) = self.teacher_email.as_deref() {
            if !email.trim().is_empty() && !email.trim().validate_email() {
                return Err(AppError::invalid("teacher_email", "Invalid teacher email"));
            }
        }
        Ok(())
    }
}

/// Classroom notice
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NoticeInput {
    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 5000, message = "Content is required"))]
    pub content: String,

    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Partial notice edit
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NoticeUpdate {
    #[serde(default, deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 1, max = 5000))]
    pub content: Option<String>,

    pub date: Option<NaiveDate>,
}

/// Normalize a requested username: lower-case, keep `[a-z0-9]`, at most 20
/// characters. An empty request falls back to the classroom name.
pub fn normalize_username(requested: &str, classroom_name: &str) -> Result<String> {
    let source = if requested.trim().is_empty() {
        classroom_name
    } else {
        requested
    };

    let username: String = source
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(USERNAME_MAX)
        .collect();

    if username.len() < USERNAME_MIN {
        return Err(AppError::invalid(
            "username",
            "Username must be 3 to 20 lowercase letters or digits",
        ));
    }

    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_valid_username() {
        assert_eq!(normalize_username("grade5", "Grade 5").unwrap(), "grade5");
    }

    #[test]
    fn test_normalize_strips_and_lowercases() {
        assert_eq!(normalize_username("Mrs. Lee's Class!", "").unwrap(), "mrsleesclass");
    }

    #[test]
    fn test_empty_username_derived_from_name() {
        assert_eq!(normalize_username("", "Grade 5 - Room B").unwrap(), "grade5roomb");
        assert_eq!(
            normalize_username("  ", "Advanced Placement Chemistry Section Two").unwrap(),
            "advancedplacementche"
        );
    }

    #[test]
    fn test_too_short_rejected() {
        let err = normalize_username("a!", "").unwrap_err();
        assert!(matches!(err, AppError::Validation { field: Some(ref f), .. } if f == "username"));
    }

    #[test]
    fn test_setup_accepts_camel_case_form() {
        let setup: ClassroomSetup = serde_json::from_value(serde_json::json!({
            "name": "Grade 5",
            "username": "grade5",
            "gradeLevel": "5",
            "academicYear": "2024-2025",
            "teacherName": "A. Smith"
        }))
        .unwrap();

        assert_eq!(setup.classroom_name, "Grade 5");
        assert!(setup.validate().is_ok());
        assert!(setup.teacher_email.is_none());
    }

    #[test]
    fn test_setup_rejects_bad_email() {
        let setup: ClassroomSetup = serde_json::from_value(serde_json::json!({
            "classroomName": "Grade 5",
            "gradeLevel": "5",
            "academicYear": "2024-2025",
            "teacherName": "A. Smith",
            "teacherEmail": "not-an-email"
        }))
        .unwrap();

        assert!(setup.validate().is_err());
    }

    #[test]
    fn test_setup_rejects_blank_names() {
        let setup: ClassroomSetup = serde_json::from_value(serde_json::json!({
            "classroomName": "   ",
            "gradeLevel": "5",
            "academicYear": "2024-2025",
            "teacherName": "  A. Smith "
        }))
        .unwrap();

        assert_eq!(setup.teacher_name, "A. Smith");
        let err = AppError::from(setup.validate().unwrap_err());
        assert!(matches!(err, AppError::Validation { field: Some(ref f), .. } if f == "classroom_name"));
    }

    #[test]
    fn test_settings_allow_clearing_email() {
        let settings: ClassroomSettings = serde_json::from_value(serde_json::json!({
            "teacher_email": "",
            "teacher_phone": ""
        }))
        .unwrap();
        assert!(settings.check().is_ok());

        let settings: ClassroomSettings =
            serde_json::from_value(serde_json::json!({ "teacher_email": "nope" })).unwrap();
        assert!(settings.check().is_err());

        let settings: ClassroomSettings =
            serde_json::from_value(serde_json::json!({ "name": "  " })).unwrap();
        assert!(settings.check().is_err());
    }
}
