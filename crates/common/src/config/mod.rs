//! Configuration management for Circle Classroom services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Identity provider and student session configuration
    pub auth: AuthConfig,

    /// Language model configuration (analysis + grade extraction)
    #[serde(default)]
    pub ai: AiConfig,

    /// Hosted billing portal configuration
    #[serde(default)]
    pub billing: BillingConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Maximum concurrent requests
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,

    /// Allowed CORS origins (empty allows any)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Primary database URL (for writes)
    pub url: String,

    /// Read replica URL (optional, falls back to primary)
    pub read_url: Option<String>,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Create missing tables from the entity definitions on startup
    #[serde(default)]
    pub bootstrap_schema: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Shared HS256 secret used by the identity provider to sign access tokens
    pub identity_jwt_secret: String,

    /// Identity provider token endpoint for the authorization-code exchange
    pub token_endpoint: Option<String>,

    /// Public API key sent to the identity provider alongside the code
    pub identity_api_key: Option<String>,

    /// Secret for signing student portal sessions
    pub student_session_secret: String,

    /// Student session lifetime in seconds
    #[serde(default = "default_student_session_ttl")]
    pub student_session_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    /// OpenAI-compatible chat completions endpoint
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,

    /// API key for the model provider
    pub api_key: Option<String>,

    /// Model used for result analysis
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Vision-capable model used for mark sheet extraction
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,

    /// Completion token cap for analysis
    #[serde(default = "default_ai_max_tokens")]
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BillingConfig {
    /// Billing provider API base
    #[serde(default = "default_billing_api_base")]
    pub api_base: String,

    /// Billing provider secret key
    pub secret_key: Option<String>,

    /// Page the billing portal returns to
    #[serde(default = "default_billing_return_url")]
    pub return_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Expose Prometheus metrics on /metrics
    #[serde(default = "default_enabled")]
    pub metrics_enabled: bool,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Student login attempts allowed per classroom per minute
    #[serde(default = "default_login_attempts")]
    pub login_attempts_per_minute: u32,

    /// Burst capacity
    #[serde(default = "default_burst")]
    pub burst: u32,

    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 30 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_max_concurrent() -> usize { 100 }
fn default_max_connections() -> u32 { 20 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 10 }
fn default_idle_timeout() -> u64 { 300 }
fn default_student_session_ttl() -> u64 { 8 * 3600 }
fn default_ai_endpoint() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_text_model() -> String { "gpt-4o-mini".to_string() }
fn default_vision_model() -> String { "gpt-4o".to_string() }
fn default_ai_timeout() -> u64 { 60 }
fn default_ai_max_tokens() -> u32 { 2000 }
fn default_billing_api_base() -> String { "https://api.stripe.com".to_string() }
fn default_billing_return_url() -> String { "http://localhost:3000/dashboard/settings".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_service_name() -> String { "circle-classroom".to_string() }
fn default_login_attempts() -> u32 { 10 }
fn default_burst() -> u32 { 5 }
fn default_enabled() -> bool { true }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            max_concurrent_requests: default_max_concurrent(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ai_endpoint(),
            api_key: None,
            text_model: default_text_model(),
            vision_model: default_vision_model(),
            timeout_secs: default_ai_timeout(),
            max_tokens: default_ai_max_tokens(),
        }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            api_base: default_billing_api_base(),
            secret_key: None,
            return_url: default_billing_return_url(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_enabled: default_enabled(),
            service_name: default_service_name(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_attempts_per_minute: default_login_attempts(),
            burst: default_burst(),
            enabled: default_enabled(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__AUTH__STUDENT_SESSION_SECRET=...
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }

    /// Get the read database URL (falls back to primary)
    pub fn read_database_url(&self) -> &str {
        self.database.read_url.as_deref().unwrap_or(&self.database.url)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "postgres://localhost/circle_classroom".to_string(),
                read_url: None,
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                connect_timeout_secs: default_connect_timeout(),
                idle_timeout_secs: default_idle_timeout(),
                bootstrap_schema: false,
            },
            auth: AuthConfig {
                identity_jwt_secret: "dev-identity-secret".to_string(),
                token_endpoint: None,
                identity_api_key: None,
                student_session_secret: "dev-student-session-secret".to_string(),
                student_session_ttl_secs: default_student_session_ttl(),
            },
            ai: AiConfig::default(),
            billing: BillingConfig::default(),
            observability: ObservabilityConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}
