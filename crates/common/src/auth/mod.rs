//! Authentication utilities
//!
//! Provides:
//! - Identity provider access-token verification (HS256 JWT)
//! - Signed, time-limited student portal sessions
//! - API key generation
//! - Bearer token extraction

use crate::errors::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by identity provider access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Account email
    #[serde(default)]
    pub email: Option<String>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}

impl IdentityClaims {
    /// Parse the subject as a user id
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::InvalidToken)
    }
}

/// Verifies (and, for tests and local tooling, issues) identity access tokens
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret
    pub fn new(secret: &str, expiration_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_secs: expiration_secs as i64,
        }
    }

    /// Generate a new access token
    pub fn generate_token(&self, user_id: Uuid, email: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiration_secs);

        let claims = IdentityClaims {
            sub: user_id.to_string(),
            email: Some(email.to_string()),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal {
                message: format!("Failed to generate token: {}", e)
            })
    }

    /// Validate and decode an access token
    pub fn validate_token(&self, token: &str) -> Result<IdentityClaims> {
        // Provider tokens carry an audience we do not pin
        let mut validation = Validation::default();
        validation.validate_aud = false;

        decode::<IdentityClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::InvalidToken,
            })
    }
}

/// Claims of a student portal session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentClaims {
    /// Student row id
    pub sub: Uuid,

    /// Classroom the session is bound to
    pub classroom_id: Uuid,

    /// Classroom public username
    pub username: String,

    /// Display name
    pub name: String,

    pub exp: i64,
    pub iat: i64,
}

/// Issues and verifies student portal sessions
pub struct StudentSessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl StudentSessionManager {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: ttl_secs as i64,
        }
    }

    /// Session lifetime in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a session for a student who just logged in
    pub fn issue(
        &self,
        student_id: Uuid,
        classroom_id: Uuid,
        username: &str,
        name: &str,
    ) -> Result<String> {
        let now = Utc::now();
        let claims = StudentClaims {
            sub: student_id,
            classroom_id,
            username: username.to_string(),
            name: name.to_string(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal {
                message: format!("Failed to sign student session: {}", e)
            })
    }

    /// Verify a session and check it belongs to the given classroom username
    pub fn verify(&self, token: &str, username: &str) -> Result<StudentClaims> {
        let denied = || AppError::StudentSessionRequired {
            username: username.to_string(),
        };

        let claims = decode::<StudentClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| denied())?;

        if claims.username != username {
            return Err(denied());
        }

        Ok(claims)
    }
}

/// Generate a new API key: `sk_` followed by 32 alphanumerics from the
/// thread-local CSPRNG
pub fn generate_api_key() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    format!("sk_{}", suffix)
}

/// Extract a bearer token from an Authorization header
pub fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
