//! Identity provider callback

use axum::{
    extract::{Query, State},
    Json,
};
use circle_common::{
    db::Repository,
    errors::{AppError, Result},
};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub access_token: String,
    pub redirect: &'static str,
}

/// Exchange the authorization code and send the user to the dashboard, or
/// to setup when they have no classroom yet
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<CallbackResponse>> {
    let code = query
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization code".to_string(),
        })?;

    let grant = state.identity.exchange_code(&code).await.map_err(|e| {
        tracing::warn!(error = %e, "Authorization code exchange failed");
        AppError::Unauthorized {
            message: "Sign-in could not be completed".to_string(),
        }
    })?;

    let claims = state.identity_tokens.validate_token(&grant.access_token)?;
    let user_id = claims.user_id()?;

    let profile = Repository::new(state.db.clone())
        .ensure_profile(user_id, claims.email.as_deref().unwrap_or_default())
        .await?;

    let redirect = if profile.classroom_id.is_some() {
        "/dashboard"
    } else {
        "/setup"
    };

    tracing::info!(user_id = %user_id, redirect, "User signed in");

    Ok(Json(CallbackResponse {
        access_token: grant.access_token,
        redirect,
    }))
}
