//! Request guards, one per audience
//!
//! Each guard is an axum extractor; a handler that takes one cannot run
//! unless the guard admits the request.

use axum::{
    extract::{FromRequestParts, Path},
    http::{header::AUTHORIZATION, request::Parts},
};
use circle_common::{
    auth::{extract_bearer, StudentClaims},
    db::models::{Classroom, Profile, Role},
    db::Repository,
    errors::{AppError, Result},
};
use uuid::Uuid;

use crate::AppState;

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer)
}

/// Any signed-in account. The profile row is created on first sight.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub profile: Profile,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts).ok_or_else(|| AppError::Unauthorized {
            message: "Missing Authorization header".to_string(),
        })?;

        let claims = state.identity_tokens.validate_token(token)?;
        let user_id = claims.user_id()?;

        let repo = Repository::new(state.db.clone());
        let profile = repo
            .ensure_profile(user_id, claims.email.as_deref().unwrap_or_default())
            .await?;

        Ok(Self { user_id, profile })
    }
}

/// A signed-in teacher with a classroom; every classroom query is scoped
/// to `classroom.id`
#[derive(Debug, Clone)]
pub struct TeacherContext {
    pub user: AuthUser,
    pub classroom: Classroom,
}

impl TeacherContext {
    pub fn classroom_id(&self) -> Uuid {
        self.classroom.id
    }
}

impl FromRequestParts<AppState> for TeacherContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let classroom_id = user.profile.classroom_id.ok_or(AppError::SetupRequired)?;
        let classroom = Repository::new(state.db.clone())
            .find_classroom(classroom_id)
            .await?
            .ok_or(AppError::SetupRequired)?;

        if classroom.teacher_id != user.user_id {
            tracing::warn!(
                user_id = %user.user_id,
                classroom_id = %classroom.id,
                "Profile points at a classroom owned by someone else"
            );
            return Err(AppError::ClassroomMismatch);
        }

        Ok(Self { user, classroom })
    }
}

/// Platform operators only
#[derive(Debug, Clone)]
pub struct SuperAdminContext {
    pub user: AuthUser,
}

impl FromRequestParts<AppState> for SuperAdminContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.profile.role != Role::SuperAdmin {
            tracing::warn!(user_id = %user.user_id, role = user.profile.role.as_str(), "Admin access denied");
            return Err(AppError::Forbidden {
                message: "Super admin access required".to_string(),
            });
        }

        Ok(Self { user })
    }
}

/// A student viewing their own classroom's portal
///
/// Only valid on routes whose single path parameter is the classroom
/// username.
#[derive(Debug, Clone)]
pub struct StudentSession {
    pub username: String,
    pub claims: StudentClaims,
}

impl FromRequestParts<AppState> for StudentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Path(username) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidFormat {
                message: e.body_text(),
            })?;

        let token = bearer_token(parts).ok_or_else(|| AppError::StudentSessionRequired {
            username: username.clone(),
        })?;

        let claims = state.student_sessions.verify(token, &username)?;

        Ok(Self { username, claims })
    }
}
