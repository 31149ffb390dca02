//! Weekly timetable input

use crate::db::models::DayOfWeek;
use crate::errors::{AppError, Result};
use chrono::NaiveTime;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TimetableEntryInput {
    pub day_of_week: DayOfWeek,

    pub start_time: NaiveTime,

    pub end_time: NaiveTime,

    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 100, message = "Subject is required"))]
    pub subject: String,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub teacher_name: String,
}

/// Check a full weekly replacement before it is written
pub fn validate_entries(entries: &[TimetableEntryInput]) -> Result<()> {
    for entry in entries {
        entry.validate()?;
        if entry.end_time <= entry.start_time {
            return Err(AppError::invalid(
                "end_time",
                format!("{} period must end after it starts", entry.subject),
            ));
        }
    }
    Ok(())
}
