//! Error types for Circle Classroom services
//!
//! Provides a comprehensive error handling system with:
//! - Distinct error types for different failure modes
//! - HTTP status code mapping
//! - Structured error responses with a known-good redirect target
//! - Error codes for client handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    MissingField,
    InvalidFormat,
    PayloadTooLarge,

    // Authentication errors (2xxx)
    Unauthorized,
    InvalidToken,
    ExpiredToken,
    StudentSessionRequired,
    InvalidLoginId,

    // Authorization errors (3xxx)
    Forbidden,
    SetupRequired,
    ClassroomMismatch,

    // Resource errors (4xxx)
    NotFound,
    StudentNotFound,
    AssignmentNotFound,

    // Conflict errors (5xxx)
    Conflict,

    // Rate limiting (6xxx)
    RateLimited,

    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,

    // External service errors (8xxx)
    UpstreamError,
    AiError,
    BillingError,
    IdentityError,

    // Internal errors (9xxx)
    InternalError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::MissingField => 1002,
            ErrorCode::InvalidFormat => 1003,
            ErrorCode::PayloadTooLarge => 1004,

            ErrorCode::Unauthorized => 2001,
            ErrorCode::InvalidToken => 2002,
            ErrorCode::ExpiredToken => 2003,
            ErrorCode::StudentSessionRequired => 2004,
            ErrorCode::InvalidLoginId => 2005,

            ErrorCode::Forbidden => 3001,
            ErrorCode::SetupRequired => 3002,
            ErrorCode::ClassroomMismatch => 3003,

            ErrorCode::NotFound => 4001,
            ErrorCode::StudentNotFound => 4003,
            ErrorCode::AssignmentNotFound => 4004,

            ErrorCode::Conflict => 5001,

            ErrorCode::RateLimited => 6001,

            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,

            ErrorCode::UpstreamError => 8001,
            ErrorCode::AiError => 8002,
            ErrorCode::BillingError => 8003,
            ErrorCode::IdentityError => 8004,

            ErrorCode::InternalError => 9001,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Required field missing: {field}")]
    MissingField { field: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    // Authentication errors
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Invalid session token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Student session required for classroom {username}")]
    StudentSessionRequired { username: String },

    #[error("Invalid login ID")]
    InvalidLoginId,

    // Authorization errors
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Classroom setup required")]
    SetupRequired,

    #[error("Resource belongs to a different classroom")]
    ClassroomMismatch,

    // Resource errors
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound { resource_type: String, id: String },

    #[error("Student not found: {id}")]
    StudentNotFound { id: String },

    #[error("Assignment not found: {id}")]
    AssignmentNotFound { id: String },

    // Conflict errors
    #[error("{message}")]
    Duplicate { message: String },

    // Rate limiting
    #[error("Rate limit exceeded: {limit} attempts per minute")]
    RateLimited { limit: u32 },

    // Database errors
    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    // External service errors
    #[error("AI service error: {message}")]
    AiError { message: String },

    #[error("Billing service error: {message}")]
    BillingError { message: String },

    #[error("Identity provider error: {message}")]
    IdentityError { message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Shorthand for a validation failure on a named field
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::MissingField { .. } => ErrorCode::MissingField,
            AppError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            AppError::PayloadTooLarge { .. } => ErrorCode::PayloadTooLarge,
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::InvalidToken => ErrorCode::InvalidToken,
            AppError::ExpiredToken => ErrorCode::ExpiredToken,
            AppError::StudentSessionRequired { .. } => ErrorCode::StudentSessionRequired,
            AppError::InvalidLoginId => ErrorCode::InvalidLoginId,
            AppError::Forbidden { .. } => ErrorCode::Forbidden,
            AppError::SetupRequired => ErrorCode::SetupRequired,
            AppError::ClassroomMismatch => ErrorCode::ClassroomMismatch,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::StudentNotFound { .. } => ErrorCode::StudentNotFound,
            AppError::AssignmentNotFound { .. } => ErrorCode::AssignmentNotFound,
            AppError::Duplicate { .. } => ErrorCode::Conflict,
            AppError::RateLimited { .. } => ErrorCode::RateLimited,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::AiError { .. } => ErrorCode::AiError,
            AppError::BillingError { .. } => ErrorCode::BillingError,
            AppError::IdentityError { .. } => ErrorCode::IdentityError,
            AppError::HttpClient(_) => ErrorCode::UpstreamError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. } |
            AppError::MissingField { .. } |
            AppError::InvalidFormat { .. } => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AppError::Unauthorized { .. } |
            AppError::InvalidToken |
            AppError::ExpiredToken |
            AppError::StudentSessionRequired { .. } |
            AppError::InvalidLoginId => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            AppError::Forbidden { .. } |
            AppError::SetupRequired |
            AppError::ClassroomMismatch => StatusCode::FORBIDDEN,

            // 404 Not Found
            AppError::NotFound { .. } |
            AppError::StudentNotFound { .. } |
            AppError::AssignmentNotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::Duplicate { .. } => StatusCode::CONFLICT,

            // 413 Payload Too Large
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,

            // 429 Too Many Requests
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            AppError::Database(_) |
            AppError::DatabaseConnection { .. } |
            AppError::Internal { .. } |
            AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 502 Bad Gateway
            AppError::AiError { .. } |
            AppError::BillingError { .. } |
            AppError::IdentityError { .. } |
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Page a client should navigate to after this error, if any
    pub fn redirect(&self) -> Option<String> {
        match self {
            AppError::Unauthorized { .. } |
            AppError::InvalidToken |
            AppError::ExpiredToken => Some("/auth/login".to_string()),
            AppError::StudentSessionRequired { username } => {
                Some(format!("/view/{}/login", username))
            }
            AppError::Forbidden { .. } => Some("/dashboard".to_string()),
            AppError::SetupRequired => Some("/setup".to_string()),
            _ => None,
        }
    }

    /// Message shown to the caller; server-side failures stay generic
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) |
            AppError::DatabaseConnection { .. } |
            AppError::Internal { .. } => "Something went wrong. Please try again.".to_string(),
            other => other.to_string(),
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let details = match &self {
            AppError::Validation { field: Some(field), .. } => {
                Some(serde_json::json!({ "field": field }))
            }
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message: self.public_message(),
                details,
                redirect: self.redirect(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::Duplicate {
                message: format!("Record already exists: {}", detail),
            },
            _ => AppError::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors.field_errors().keys().next().map(|f| f.to_string());
        AppError::Validation {
            message: errors.to_string(),
            field,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => AppError::Validation {
                message: err.body_text(),
                field: None,
            },
            JsonRejection::MissingJsonContentType(_) => AppError::MissingField {
                field: "Content-Type: application/json".to_string(),
            },
            other => AppError::InvalidFormat {
                message: other.body_text(),
            },
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::StudentNotFound { id: "test".into() };
        assert_eq!(err.code(), ErrorCode::StudentNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_error() {
        let err = AppError::invalid("first_name", "First name is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.is_server_error());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_server_error_is_generic() {
        let err = AppError::Internal {
            message: "connection reset by peer".into()
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
        assert!(!err.public_message().contains("connection reset"));
    }

    #[test]
    fn test_redirect_targets() {
        assert_eq!(AppError::SetupRequired.redirect().as_deref(), Some("/setup"));
        assert_eq!(AppError::ExpiredToken.redirect().as_deref(), Some("/auth/login"));
        assert_eq!(
            AppError::Forbidden { message: "super_admin only".into() }.redirect().as_deref(),
            Some("/dashboard")
        );
        assert_eq!(
            AppError::StudentSessionRequired { username: "grade5".into() }.redirect().as_deref(),
            Some("/view/grade5/login")
        );
        assert_eq!(AppError::InvalidLoginId.redirect(), None);
    }

    #[test]
    fn test_duplicate_message_is_user_facing() {
        let err = AppError::Duplicate {
            message: "Username already taken. Please choose another.".into(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.public_message(), "Username already taken. Please choose another.");
    }
}
