//! Classroom notices

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use circle_common::{
    db::models::Notice,
    db::Repository,
    domain::{NoticeInput, NoticeUpdate},
    errors::Result,
};
use uuid::Uuid;
use validator::Validate;

use super::today;
use crate::middleware::{AppJson, TeacherContext};
use crate::AppState;

pub async fn list_notices(
    State(state): State<AppState>,
    teacher: TeacherContext,
) -> Result<Json<Vec<Notice>>> {
    let notices = Repository::new(state.db.clone())
        .list_notices(teacher.classroom_id())
        .await?;
    Ok(Json(notices))
}

pub async fn create_notice(
    State(state): State<AppState>,
    teacher: TeacherContext,
    AppJson(input): AppJson<NoticeInput>,
) -> Result<(StatusCode, Json<Notice>)> {
    input.validate()?;

    let notice = Repository::new(state.db.clone())
        .create_notice(teacher.classroom_id(), input, today())
        .await?;
    Ok((StatusCode::CREATED, Json(notice)))
}

pub async fn update_notice(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Path(id): Path<Uuid>,
    AppJson(update): AppJson<NoticeUpdate>,
) -> Result<Json<Notice>> {
    update.validate()?;

    let notice = Repository::new(state.db.clone())
        .update_notice(teacher.classroom_id(), id, update)
        .await?;
    Ok(Json(notice))
}

pub async fn delete_notice(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    Repository::new(state.db.clone())
        .delete_notice(teacher.classroom_id(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
