//! Weekly timetable

use axum::{extract::State, Json};
use circle_common::{
    db::models::TimetableEntry,
    db::Repository,
    domain::{timetable::validate_entries, TimetableEntryInput},
    errors::Result,
};
use serde::{Deserialize, Serialize};

use crate::middleware::{AppJson, TeacherContext};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReplaceTimetable {
    #[serde(default)]
    pub entries: Vec<TimetableEntryInput>,
}

#[derive(Serialize)]
pub struct Timetable {
    pub entries: Vec<TimetableEntry>,
}

pub async fn get_timetable(
    State(state): State<AppState>,
    teacher: TeacherContext,
) -> Result<Json<Timetable>> {
    let entries = Repository::new(state.db.clone())
        .list_timetable(teacher.classroom_id())
        .await?;
    Ok(Json(Timetable { entries }))
}

/// Replace the whole week
pub async fn replace_timetable(
    State(state): State<AppState>,
    teacher: TeacherContext,
    AppJson(body): AppJson<ReplaceTimetable>,
) -> Result<Json<Timetable>> {
    validate_entries(&body.entries)?;

    let entries = Repository::new(state.db.clone())
        .replace_timetable(teacher.classroom_id(), body.entries)
        .await?;
    Ok(Json(Timetable { entries }))
}
