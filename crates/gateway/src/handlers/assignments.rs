//! Assignments, grade entry and mark sheet extraction

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use circle_common::{
    ai::{ExtractedGrades, MarkSheetImage},
    db::models::{Assignment, Grade},
    db::{GradeRow, Repository},
    domain::{match_extracted_names, AssignmentInput},
    errors::Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::today;
use crate::middleware::{AppJson, TeacherContext};
use crate::AppState;

#[derive(Serialize)]
pub struct AssignmentList {
    pub assignments: Vec<Assignment>,
}

#[derive(Serialize)]
pub struct AssignmentGrades {
    pub assignment: Assignment,
    pub grades: Vec<GradeRow>,
}

#[derive(Debug, Deserialize)]
pub struct SaveGrades {
    /// Student id -> marks obtained
    pub grades: HashMap<Uuid, f64>,
}

#[derive(Serialize)]
pub struct SavedGrades {
    pub grades: Vec<Grade>,
}

#[derive(Debug, Deserialize)]
pub struct ImageUpload {
    #[serde(default)]
    pub image: String,
}

/// Extracted marks matched against the roster, ready to review and save
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedExtraction {
    pub grades: HashMap<Uuid, f64>,
    pub unmatched: Vec<String>,
    pub extracted_grades: ExtractedGrades,
}

pub async fn list_assignments(
    State(state): State<AppState>,
    teacher: TeacherContext,
) -> Result<Json<AssignmentList>> {
    let assignments = Repository::new(state.db.clone())
        .list_assignments(teacher.classroom_id())
        .await?;
    Ok(Json(AssignmentList { assignments }))
}

pub async fn create_assignment(
    State(state): State<AppState>,
    teacher: TeacherContext,
    AppJson(input): AppJson<AssignmentInput>,
) -> Result<(StatusCode, Json<Assignment>)> {
    let resolved = input.resolve(today())?;

    let assignment = Repository::new(state.db.clone())
        .create_assignment(teacher.classroom_id(), resolved)
        .await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn get_assignment(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Assignment>> {
    let assignment = Repository::new(state.db.clone())
        .get_assignment(teacher.classroom_id(), id)
        .await?;
    Ok(Json(assignment))
}

pub async fn delete_assignment(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    Repository::new(state.db.clone())
        .delete_assignment(teacher.classroom_id(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_grades(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Path(id): Path<Uuid>,
) -> Result<Json<AssignmentGrades>> {
    let (assignment, grades) = Repository::new(state.db.clone())
        .list_grades(teacher.classroom_id(), id)
        .await?;
    Ok(Json(AssignmentGrades { assignment, grades }))
}

pub async fn save_grades(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Path(id): Path<Uuid>,
    AppJson(body): AppJson<SaveGrades>,
) -> Result<Json<SavedGrades>> {
    let grades = Repository::new(state.db.clone())
        .save_grades(teacher.classroom_id(), id, &body.grades)
        .await?;
    Ok(Json(SavedGrades { grades }))
}

/// Read a photographed mark sheet and line the marks up with the roster.
/// Nothing is saved.
pub async fn extract_grades(
    State(state): State<AppState>,
    teacher: TeacherContext,
    Path(id): Path<Uuid>,
    AppJson(upload): AppJson<ImageUpload>,
) -> Result<Json<MatchedExtraction>> {
    let repo = Repository::new(state.db.clone());
    repo.get_assignment(teacher.classroom_id(), id).await?;

    let image = MarkSheetImage::parse(&upload.image)?;
    let extracted = state.model.extract_grades(&image).await?;

    let roster = repo.list_students(teacher.classroom_id()).await?;
    let pairs: Vec<(String, f64)> = extracted
        .grades
        .iter()
        .map(|g| (g.student_name.clone(), g.marks))
        .collect();
    let matched = match_extracted_names(&roster, &pairs);

    tracing::info!(
        classroom_id = %teacher.classroom_id(),
        assignment_id = %id,
        matched = matched.matched.len(),
        unmatched = matched.unmatched.len(),
        "Mark sheet matched against roster"
    );

    Ok(Json(MatchedExtraction {
        grades: matched.matched,
        unmatched: matched.unmatched,
        extracted_grades: extracted,
    }))
}
