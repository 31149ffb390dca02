//! Super-admin console inputs

use crate::db::models::{Priority, Role, SchoolStatus, SubscriptionTier};
use serde::Deserialize;
use validator::Validate;

use super::empty_as_none;

fn default_tier() -> SubscriptionTier { SubscriptionTier::Free }
fn default_max_students() -> i32 { 50 }
fn default_max_teachers() -> i32 { 5 }
fn default_priority() -> Priority { Priority::Normal }
fn default_audience() -> String { "all".to_string() }

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SchoolInput {
    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 200, message = "School name is required"))]
    pub name: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub admin_name: Option<String>,

    #[validate(email(message = "Invalid admin email"))]
    pub admin_email: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub address: Option<String>,

    #[serde(default = "default_tier")]
    pub subscription_tier: SubscriptionTier,

    #[serde(default = "default_max_students")]
    #[validate(range(min = 1))]
    pub max_students: i32,

    #[serde(default = "default_max_teachers")]
    #[validate(range(min = 1))]
    pub max_teachers: i32,

    /// Falls back to the admin email
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email(message = "Invalid billing email"))]
    pub billing_email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchoolStatusChange {
    pub status: SchoolStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnnouncementInput {
    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 5000, message = "Content is required"))]
    pub content: String,

    #[serde(default = "default_priority")]
    pub priority: Priority,

    #[serde(default = "default_audience", deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 50))]
    pub target_audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementToggle {
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApiKeyInput {
    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 100, message = "Key name is required"))]
    pub key_name: String,
}
