//! Billing portal link

use axum::{extract::State, Json};
use circle_common::{
    billing::{open_portal, PortalSession},
    errors::Result,
};

use crate::middleware::AuthUser;
use crate::AppState;

pub async fn portal(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PortalSession>> {
    let session = open_portal(
        state.billing.as_ref(),
        user.profile.billing_customer_id.as_deref(),
    )
    .await?;

    tracing::info!(user_id = %user.user_id, "Billing portal opened");
    Ok(Json(session))
}
