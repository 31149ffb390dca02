//! Classroom setup, dashboard overview and settings

use axum::{extract::State, http::StatusCode, Json};
use circle_common::{
    db::models::Classroom,
    db::{DashboardOverview, Repository},
    domain::{normalize_username, ClassroomSettings, ClassroomSetup},
    errors::Result,
};
use serde::Serialize;
use validator::Validate;

use super::today;
use crate::middleware::{AppJson, AuthUser, TeacherContext};
use crate::AppState;

#[derive(Serialize)]
pub struct SetupResponse {
    pub classroom: Classroom,
    pub redirect: &'static str,
}

/// Create the caller's classroom
pub async fn setup(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(form): AppJson<ClassroomSetup>,
) -> Result<(StatusCode, Json<SetupResponse>)> {
    form.validate()?;
    let username = normalize_username(&form.username, &form.classroom_name)?;

    let classroom = Repository::new(state.db.clone())
        .create_classroom(user.user_id, &form, &username)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SetupResponse {
            classroom,
            redirect: "/dashboard",
        }),
    ))
}

pub async fn dashboard(
    State(state): State<AppState>,
    teacher: TeacherContext,
) -> Result<Json<DashboardOverview>> {
    let overview = Repository::new(state.db.clone())
        .dashboard_overview(teacher.classroom_id(), today())
        .await?;
    Ok(Json(overview))
}

pub async fn get_settings(teacher: TeacherContext) -> Json<Classroom> {
    Json(teacher.classroom)
}

pub async fn update_settings(
    State(state): State<AppState>,
    teacher: TeacherContext,
    AppJson(settings): AppJson<ClassroomSettings>,
) -> Result<Json<Classroom>> {
    settings.check()?;

    let classroom = Repository::new(state.db.clone())
        .update_classroom_settings(teacher.classroom_id(), settings)
        .await?;
    Ok(Json(classroom))
}
