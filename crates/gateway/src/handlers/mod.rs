//! API handlers module

pub mod admin;
pub mod ai;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod billing;
pub mod classroom;
pub mod health;
pub mod notices;
pub mod portal;
pub mod students;
pub mod timetable;

use chrono::{NaiveDate, Utc};

/// The school day, in UTC
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
