//! Circle Classroom Common Library
//!
//! Shared code for the Circle Classroom services including:
//! - Database models, schema bootstrap and repository
//! - Classroom domain rules (roster, attendance, grading, timetable)
//! - Error types and handling
//! - Configuration management
//! - Identity tokens and student sessions
//! - Language model, billing and identity provider clients
//! - Metrics and observability

pub mod ai;
pub mod auth;
pub mod billing;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod identity;
pub mod metrics;
pub mod qr;

// Re-export commonly used types
pub use ai::LanguageModel;
pub use billing::BillingPortal;
pub use config::AppConfig;
pub use db::{DbPool, Repository};
pub use errors::{AppError, Result};
pub use identity::IdentityProvider;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
