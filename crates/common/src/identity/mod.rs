//! Authorization-code exchange with the identity provider

use crate::auth::JwtManager;
use crate::config::AuthConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// Tokens returned by the provider for a successful exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant>;
}

/// HTTP client for the provider's token endpoint
pub struct HttpIdentityProvider {
    token_endpoint: Option<String>,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpIdentityProvider {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            token_endpoint: config.token_endpoint.clone(),
            api_key: config.identity_api_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant> {
        let endpoint = self.token_endpoint.as_deref().ok_or_else(|| AppError::IdentityError {
            message: "Token endpoint is not configured".to_string(),
        })?;

        let mut request = self.client.post(endpoint).form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let response = request.send().await.map_err(|e| AppError::IdentityError {
            message: format!("Request failed: {}", e),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::IdentityError {
                message: format!("Code exchange rejected with {}", status),
            });
        }

        response.json().await.map_err(|e| AppError::IdentityError {
            message: format!("Failed to parse token response: {}", e),
        })
    }
}

/// Issues locally signed tokens for known codes
pub struct MockIdentityProvider {
    jwt: JwtManager,
    users: HashMap<String, (Uuid, String)>,
}

impl MockIdentityProvider {
    pub fn new(jwt: JwtManager) -> Self {
        Self {
            jwt,
            users: HashMap::new(),
        }
    }

    pub fn with_user(mut self, code: &str, user_id: Uuid, email: &str) -> Self {
        self.users.insert(code.to_string(), (user_id, email.to_string()));
        self
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant> {
        let (user_id, email) = self.users.get(code).ok_or_else(|| AppError::IdentityError {
            message: "Unknown authorization code".to_string(),
        })?;

        Ok(TokenGrant {
            access_token: self.jwt.generate_token(*user_id, email)?,
            expires_in: None,
            refresh_token: None,
        })
    }
}
