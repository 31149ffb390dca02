//! Request guards and cross-cutting layers

pub mod auth;
pub mod json;
pub mod metrics;
pub mod rate_limit;

pub use auth::{AuthUser, StudentSession, SuperAdminContext, TeacherContext};
pub use json::AppJson;
pub use rate_limit::{ClientAddr, LoginRateLimiter};
