//! Classroom domain rules
//!
//! Pure functions and validated input types shared by the repository and
//! the HTTP handlers. Nothing in here touches the database.

pub mod admin;
pub mod analytics;
pub mod attendance;
pub mod classroom;
pub mod grading;
pub mod names;
pub mod roster;
pub mod timetable;

pub use analytics::{growth_percentage, PlatformHealth};
pub use attendance::{AttendanceSheet, AttendanceSummary};
pub use classroom::{normalize_username, ClassroomSetup, ClassroomSettings, NoticeInput, NoticeUpdate};
pub use grading::{band_for, compute_percentage, default_grade_bands, AssignmentInput, ResolvedAssignment};
pub use names::{match_extracted_names, NameMatch};
pub use roster::{generate_login_id, generate_student_id, StudentInput, StudentUpdate};
pub use timetable::TimetableEntryInput;

use serde::{Deserialize, Deserializer};

/// Form fields arrive as "" when left blank
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

/// Required text is kept trimmed, so a blank entry fails `length(min = 1)`
pub(crate) fn trimmed<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

/// Trimmed partial-update text; a blank `Some` survives for the length check
pub(crate) fn trimmed_opt<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}
