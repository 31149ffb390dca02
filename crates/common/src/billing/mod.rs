//! Hosted billing portal sessions (Stripe-compatible API)

use crate::config::BillingConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const NO_BILLING_CUSTOMER: &str = "No billing customer found. Please subscribe first.";

/// A one-off link into the provider's billing portal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalSession {
    pub url: String,
}

#[async_trait]
pub trait BillingPortal: Send + Sync {
    async fn create_session(&self, customer_id: &str) -> Result<PortalSession>;
}

/// Open a portal session for a profile's billing customer, if it has one
pub async fn open_portal(
    portal: &dyn BillingPortal,
    customer_id: Option<&str>,
) -> Result<PortalSession> {
    let customer_id = customer_id
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::Validation {
            message: NO_BILLING_CUSTOMER.to_string(),
            field: None,
        })?;

    portal.create_session(customer_id).await
}

/// Client for `POST /v1/billing_portal/sessions`
pub struct StripePortal {
    config: BillingConfig,
    client: reqwest::Client,
}

impl StripePortal {
    pub fn new(config: BillingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl BillingPortal for StripePortal {
    async fn create_session(&self, customer_id: &str) -> Result<PortalSession> {
        let secret = self.config.secret_key.as_deref().ok_or_else(|| AppError::BillingError {
            message: "Billing provider is not configured".to_string(),
        })?;

        let url = format!(
            "{}/v1/billing_portal/sessions",
            self.config.api_base.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(secret)
            .form(&[
                ("customer", customer_id),
                ("return_url", self.config.return_url.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::BillingError {
                message: format!("Request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Billing portal session rejected");
            return Err(AppError::BillingError {
                message: format!("API error {}: {}", status, body),
            });
        }

        let session: PortalSession = response.json().await.map_err(|e| AppError::BillingError {
            message: format!("Failed to parse response: {}", e),
        })?;

        tracing::info!("Billing portal session created");
        Ok(session)
    }
}

/// Returns a deterministic portal URL without calling out
#[derive(Debug, Clone, Default)]
pub struct MockBillingPortal;

#[async_trait]
impl BillingPortal for MockBillingPortal {
    async fn create_session(&self, customer_id: &str) -> Result<PortalSession> {
        Ok(PortalSession {
            url: format!("https://billing.test/session/{}", customer_id),
        })
    }
}
