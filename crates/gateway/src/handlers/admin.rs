//! Super-admin console

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use circle_common::{
    db::models::{Announcement, ApiKey, AuditLog, PlatformMetric, Profile, School},
    db::{AdminOverview, Repository},
    domain::admin::{
        AnnouncementInput, AnnouncementToggle, ApiKeyInput, RoleChange, SchoolInput,
        SchoolStatusChange,
    },
    domain::analytics::PlatformGrowth,
    errors::Result,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use super::today;
use crate::middleware::{AppJson, SuperAdminContext};
use crate::AppState;

#[derive(Serialize)]
pub struct Analytics {
    pub growth: PlatformGrowth,
    pub snapshots: Vec<PlatformMetric>,
}

pub async fn overview(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
) -> Result<Json<AdminOverview>> {
    let overview = Repository::new(state.db.clone()).admin_overview(today()).await?;
    Ok(Json(overview))
}

pub async fn analytics(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
) -> Result<Json<Analytics>> {
    let snapshots = Repository::new(state.db.clone()).recent_platform_metrics().await?;
    Ok(Json(Analytics {
        growth: PlatformGrowth::from_snapshots(&snapshots),
        snapshots,
    }))
}

// ============================================================================
// Schools
// ============================================================================

pub async fn list_schools(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
) -> Result<Json<Vec<School>>> {
    Ok(Json(Repository::new(state.db.clone()).list_schools().await?))
}

pub async fn create_school(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
    AppJson(input): AppJson<SchoolInput>,
) -> Result<(StatusCode, Json<School>)> {
    input.validate()?;
    let school = Repository::new(state.db.clone()).create_school(input).await?;
    Ok((StatusCode::CREATED, Json(school)))
}

pub async fn update_school_status(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
    Path(id): Path<Uuid>,
    AppJson(change): AppJson<SchoolStatusChange>,
) -> Result<Json<School>> {
    let school = Repository::new(state.db.clone())
        .update_school_status(id, change.status)
        .await?;
    Ok(Json(school))
}

// ============================================================================
// Users
// ============================================================================

pub async fn list_users(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
) -> Result<Json<Vec<Profile>>> {
    Ok(Json(Repository::new(state.db.clone()).list_profiles().await?))
}

pub async fn change_role(
    State(state): State<AppState>,
    admin: SuperAdminContext,
    Path(id): Path<Uuid>,
    AppJson(change): AppJson<RoleChange>,
) -> Result<Json<Profile>> {
    let profile = Repository::new(state.db.clone())
        .change_role(admin.user.user_id, id, change.role)
        .await?;
    Ok(Json(profile))
}

pub async fn user_audit(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AuditLog>>> {
    let trail = Repository::new(state.db.clone())
        .audit_trail("user", &id.to_string())
        .await?;
    Ok(Json(trail))
}

// ============================================================================
// Announcements
// ============================================================================

pub async fn list_announcements(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
) -> Result<Json<Vec<Announcement>>> {
    Ok(Json(Repository::new(state.db.clone()).list_announcements().await?))
}

pub async fn create_announcement(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
    AppJson(input): AppJson<AnnouncementInput>,
) -> Result<(StatusCode, Json<Announcement>)> {
    input.validate()?;
    let announcement = Repository::new(state.db.clone())
        .create_announcement(input)
        .await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

pub async fn toggle_announcement(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
    Path(id): Path<Uuid>,
    AppJson(toggle): AppJson<AnnouncementToggle>,
) -> Result<Json<Announcement>> {
    let announcement = Repository::new(state.db.clone())
        .set_announcement_active(id, toggle.active)
        .await?;
    Ok(Json(announcement))
}

// ============================================================================
// API keys
// ============================================================================

pub async fn list_api_keys(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
) -> Result<Json<Vec<ApiKey>>> {
    Ok(Json(Repository::new(state.db.clone()).list_api_keys().await?))
}

pub async fn create_api_key(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
    AppJson(input): AppJson<ApiKeyInput>,
) -> Result<(StatusCode, Json<ApiKey>)> {
    input.validate()?;
    let key = Repository::new(state.db.clone())
        .create_api_key(&input.key_name)
        .await?;
    Ok((StatusCode::CREATED, Json(key)))
}

pub async fn revoke_api_key(
    State(state): State<AppState>,
    _admin: SuperAdminContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiKey>> {
    let key = Repository::new(state.db.clone()).revoke_api_key(id).await?;
    Ok(Json(key))
}
