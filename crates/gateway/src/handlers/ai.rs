//! Language model helpers

use axum::{extract::State, Json};
use circle_common::{
    ai::{AnalysisRequest, ExtractedGrades, MarkSheetImage},
    errors::Result,
};
use serde::Serialize;

use super::assignments::ImageUpload;
use crate::middleware::{AppJson, AuthUser};
use crate::AppState;

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResponse {
    pub extracted_grades: ExtractedGrades,
}

pub async fn analyze_results(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>> {
    request.check()?;

    tracing::info!(
        user_id = %user.user_id,
        grades = request.grades.len(),
        model = state.model.model_name(),
        "Analyzing results"
    );

    let analysis = state.model.analyze_results(&request).await?;
    Ok(Json(AnalysisResponse { analysis }))
}

pub async fn extract_grades(
    State(state): State<AppState>,
    _user: AuthUser,
    AppJson(upload): AppJson<ImageUpload>,
) -> Result<Json<ExtractionResponse>> {
    let image = MarkSheetImage::parse(&upload.image)?;
    let extracted_grades = state.model.extract_grades(&image).await?;
    Ok(Json(ExtractionResponse { extracted_grades }))
}
