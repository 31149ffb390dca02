//! Daily attendance sheet

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use circle_common::{db::Repository, domain::AttendanceSheet, errors::Result};
use serde::{Deserialize, Serialize};

use super::today;
use crate::middleware::{AppJson, TeacherContext};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SaveAttendance {
    pub date: NaiveDate,
    #[serde(default)]
    pub attendance: AttendanceSheet,
}

#[derive(Debug, Serialize)]
pub struct AttendanceDay {
    pub date: NaiveDate,
    pub attendance: AttendanceSheet,
    pub marked: usize,
}

/// One day's sheet; defaults to today
pub async fn load(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Query(query): Query<DateQuery>,
) -> Result<Json<AttendanceDay>> {
    let date = query.date.unwrap_or_else(today);
    let attendance = Repository::new(state.db.clone())
        .load_attendance(teacher.classroom_id(), date)
        .await?;

    Ok(Json(AttendanceDay {
        date,
        marked: attendance.len(),
        attendance,
    }))
}

/// Replace the day's sheet with the submitted one
pub async fn save(
    State(state): State<AppState>,
    teacher: TeacherContext,
    AppJson(body): AppJson<SaveAttendance>,
) -> Result<Json<AttendanceDay>> {
    let repo = Repository::new(state.db.clone());
    repo.save_attendance(teacher.classroom_id(), body.date, &body.attendance)
        .await?;

    let attendance = repo.load_attendance(teacher.classroom_id(), body.date).await?;
    Ok(Json(AttendanceDay {
        date: body.date,
        marked: attendance.len(),
        attendance,
    }))
}
