//! Roster handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use circle_common::{
    db::models::{Attendance, Student},
    db::Repository,
    domain::{AttendanceSummary, StudentInput, StudentUpdate},
    errors::Result,
    qr::{login_qr_svg, qr_filename},
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::{AppJson, TeacherContext};
use crate::AppState;

#[derive(Serialize)]
pub struct StudentList {
    pub students: Vec<Student>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct AttendanceHistory {
    pub records: Vec<Attendance>,
    pub summary: AttendanceSummary,
}

pub async fn list_students(
    State(state): State<AppState>,
    teacher: TeacherContext,
) -> Result<Json<StudentList>> {
    let students = Repository::new(state.db.clone())
        .list_students(teacher.classroom_id())
        .await?;

    Ok(Json(StudentList {
        total: students.len(),
        students,
    }))
}

pub async fn create_student(
    State(state): State<AppState>,
    teacher: TeacherContext,
    AppJson(input): AppJson<StudentInput>,
) -> Result<(StatusCode, Json<Student>)> {
    input.validate()?;

    let student = Repository::new(state.db.clone())
        .create_student(&teacher.classroom, input)
        .await?;

    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn get_student(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Student>> {
    let student = Repository::new(state.db.clone())
        .get_student(teacher.classroom_id(), id)
        .await?;
    Ok(Json(student))
}

pub async fn update_student(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Path(id): Path<Uuid>,
    AppJson(update): AppJson<StudentUpdate>,
) -> Result<Json<Student>> {
    update.check()?;

    let student = Repository::new(state.db.clone())
        .update_student(teacher.classroom_id(), id, update)
        .await?;
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    Repository::new(state.db.clone())
        .delete_student(teacher.classroom_id(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Login card as a downloadable SVG
pub async fn student_qr(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let student = Repository::new(state.db.clone())
        .get_student(teacher.classroom_id(), id)
        .await?;

    let svg = login_qr_svg(&student.login_id)?;
    let disposition = format!("attachment; filename=\"{}\"", qr_filename(&student.student_id));

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        svg,
    )
        .into_response())
}

pub async fn student_attendance(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Path(id): Path<Uuid>,
) -> Result<Json<AttendanceHistory>> {
    let repo = Repository::new(state.db.clone());
    repo.get_student(teacher.classroom_id(), id).await?;

    let records = repo.student_attendance(teacher.classroom_id(), id).await?;
    let summary = AttendanceSummary::from_statuses(records.iter().map(|r| r.status));

    Ok(Json(AttendanceHistory { records, summary }))
}
