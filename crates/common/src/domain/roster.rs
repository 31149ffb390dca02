//! Student roster input and identifier generation

use crate::errors::{AppError, Result};
use chrono::NaiveDate;
use rand::Rng;
use serde::Deserialize;
use validator::{Validate, ValidateEmail};

use super::empty_as_none;

/// New student form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StudentInput {
    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 50, message = "First name is required"))]
    pub first_name: String,

    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 50, message = "Last name is required"))]
    pub last_name: String,

    pub date_of_birth: NaiveDate,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub gender: Option<String>,

    #[serde(alias = "parent_name", deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 100, message = "Parent/guardian name is required"))]
    pub parent_guardian_name: String,

    #[serde(default, alias = "parent_email", deserialize_with = "empty_as_none")]
    #[validate(email(message = "Invalid parent/guardian email"))]
    pub parent_guardian_email: Option<String>,

    #[serde(alias = "parent_phone", deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 32, message = "Parent/guardian phone is required"))]
    pub parent_guardian_phone: String,

    #[serde(default, alias = "emergency_contact", deserialize_with = "empty_as_none")]
    pub emergency_contact_name: Option<String>,

    #[serde(default, alias = "emergency_phone", deserialize_with = "empty_as_none")]
    pub emergency_contact_phone: Option<String>,

    #[serde(default, alias = "medical_notes", deserialize_with = "empty_as_none")]
    pub medical_conditions: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(url(message = "Invalid photo URL"))]
    pub photo_url: Option<String>,
}

/// Partial student update. `None` keeps the stored value; for nullable
/// columns an empty string clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StudentUpdate {
    #[serde(default, deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,

    pub date_of_birth: Option<NaiveDate>,

    pub gender: Option<String>,

    #[serde(default, alias = "parent_name", deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 1, max = 100))]
    pub parent_guardian_name: Option<String>,

    #[serde(alias = "parent_email")]
    pub parent_guardian_email: Option<String>,

    #[serde(default, alias = "parent_phone", deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 1, max = 32))]
    pub parent_guardian_phone: Option<String>,

    #[serde(alias = "emergency_contact")]
    pub emergency_contact_name: Option<String>,

    #[serde(alias = "emergency_phone")]
    pub emergency_contact_phone: Option<String>,

    #[serde(alias = "medical_notes")]
    pub medical_conditions: Option<String>,

    pub address: Option<String>,

    pub photo_url: Option<String>,
}

impl StudentUpdate {
    /// Field checks beyond the derive: a non-blank email must be well formed
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if let Some(email) = self.parent_guardian_email.as_deref() {
            if !email.trim().is_empty() && !email.validate_email() {
                return Err(AppError::invalid(
                    "parent_guardian_email",
                    "Invalid parent/guardian email",
                ));
            }
        }
        Ok(())
    }
}

fn prefix(name: &str, len: usize) -> String {
    name.trim().chars().take(len).collect()
}

/// Portal login code: first 3 letters of each name plus 4 digits, upper-cased
pub fn generate_login_id<R: Rng + ?Sized>(first_name: &str, last_name: &str, rng: &mut R) -> String {
    let digits: u32 = rng.gen_range(1000..=9999);
    format!("{}{}{}", prefix(first_name, 3), prefix(last_name, 3), digits).to_uppercase()
}

/// School identifier: first 2 letters of each name plus 6 digits, upper-cased
pub fn generate_student_id<R: Rng + ?Sized>(first_name: &str, last_name: &str, rng: &mut R) -> String {
    let digits: u32 = rng.gen_range(100_000..=999_999);
    format!("{}{}{}", prefix(first_name, 2), prefix(last_name, 2), digits).to_uppercase()
}
