//! Super-admin console: schools, users, announcements, API keys, analytics

use super::Repository;
use crate::auth::generate_api_key;
use crate::db::models::*;
use crate::domain::admin::{AnnouncementInput, SchoolInput};
use crate::domain::analytics::{PlatformHealth, GROWTH_WINDOW};
use crate::domain::attendance::attendance_rate;
use crate::errors::{AppError, Result};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct TierCount {
    pub tier: SubscriptionTier,
    pub schools: u64,
}

/// Platform totals for the admin landing page
#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub total_schools: u64,
    pub active_schools: u64,
    pub schools_by_tier: Vec<TierCount>,
    pub total_students: u64,
    pub total_teachers: u64,
    pub present_today: u64,
    pub attendance_rate: u32,
    pub health: PlatformHealth,
}

impl Repository {
    // ========================================================================
    // School Operations
    // ========================================================================

    /// Register a school; it starts active and bills the admin unless told otherwise
    pub async fn create_school(&self, input: SchoolInput) -> Result<School> {
        let billing_email = input
            .billing_email
            .unwrap_or_else(|| input.admin_email.clone());

        let school = SchoolActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            admin_name: Set(input.admin_name),
            admin_email: Set(input.admin_email),
            phone: Set(input.phone),
            address: Set(input.address),
            subscription_tier: Set(input.subscription_tier),
            max_students: Set(input.max_students),
            max_teachers: Set(input.max_teachers),
            status: Set(SchoolStatus::Active),
            billing_email: Set(billing_email),
            created_at: Set(Utc::now()),
        }
        .insert(self.write_conn())
        .await?;

        info!(school_id = %school.id, tier = ?school.subscription_tier, "School created");
        Ok(school)
    }

    /// All schools, newest first
    pub async fn list_schools(&self) -> Result<Vec<School>> {
        SchoolEntity::find()
            .order_by_desc(SchoolColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Any status may move to any other
    pub async fn update_school_status(&self, id: Uuid, status: SchoolStatus) -> Result<School> {
        let school = SchoolEntity::find_by_id(id)
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::NotFound {
                resource_type: "school".to_string(),
                id: id.to_string(),
            })?;

        let previous = school.status;
        let mut active = school.into_active_model();
        active.status = Set(status);
        let updated = active.update(self.write_conn()).await?;

        info!(school_id = %id, from = ?previous, to = ?status, "School status changed");
        Ok(updated)
    }

    // ========================================================================
    // User Operations
    // ========================================================================

    /// All profiles, newest first
    pub async fn list_profiles(&self) -> Result<Vec<Profile>> {
        ProfileEntity::find()
            .order_by_desc(ProfileColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Change a user's role and write the audit row in the same transaction
    pub async fn change_role(&self, actor_id: Uuid, user_id: Uuid, role: Role) -> Result<Profile> {
        let txn = self.write_conn().begin().await?;

        let profile = ProfileEntity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound {
                resource_type: "user".to_string(),
                id: user_id.to_string(),
            })?;

        let old_role = profile.role;
        let mut active = profile.into_active_model();
        active.role = Set(role);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        AuditLogActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(actor_id),
            action: Set("role_changed".to_string()),
            resource_type: Set("user".to_string()),
            resource_id: Set(user_id.to_string()),
            details: Set(json!({
                "old_role": old_role.as_str(),
                "new_role": role.as_str(),
            })),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            actor_id = %actor_id,
            user_id = %user_id,
            old_role = old_role.as_str(),
            new_role = role.as_str(),
            "Role changed"
        );

        Ok(updated)
    }

    /// Audit rows about one resource, newest first
    pub async fn audit_trail(&self, resource_type: &str, resource_id: &str) -> Result<Vec<AuditLog>> {
        AuditLogEntity::find()
            .filter(AuditLogColumn::ResourceType.eq(resource_type))
            .filter(AuditLogColumn::ResourceId.eq(resource_id))
            .order_by_desc(AuditLogColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Announcement Operations
    // ========================================================================

    pub async fn create_announcement(&self, input: AnnouncementInput) -> Result<Announcement> {
        let announcement = AnnouncementActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title.trim().to_string()),
            content: Set(input.content),
            priority: Set(input.priority),
            target_audience: Set(input.target_audience),
            active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(self.write_conn())
        .await?;

        info!(announcement_id = %announcement.id, priority = ?announcement.priority, "Announcement published");
        Ok(announcement)
    }

    pub async fn list_announcements(&self) -> Result<Vec<Announcement>> {
        AnnouncementEntity::find()
            .order_by_desc(AnnouncementColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn set_announcement_active(&self, id: Uuid, active: bool) -> Result<Announcement> {
        let announcement = AnnouncementEntity::find_by_id(id)
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::NotFound {
                resource_type: "announcement".to_string(),
                id: id.to_string(),
            })?;

        let mut model = announcement.into_active_model();
        model.active = Set(active);
        model.update(self.write_conn()).await.map_err(Into::into)
    }

    // ========================================================================
    // API Key Operations
    // ========================================================================

    /// Generate and store a new key; the secret is returned to the caller
    pub async fn create_api_key(&self, key_name: &str) -> Result<ApiKey> {
        let key = ApiKeyActiveModel {
            id: Set(Uuid::new_v4()),
            key_name: Set(key_name.trim().to_string()),
            api_key: Set(generate_api_key()),
            is_active: Set(true),
            last_used_at: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(self.write_conn())
        .await?;

        info!(api_key_id = %key.id, key_name = %key.key_name, "API key generated");
        Ok(key)
    }

    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>> {
        ApiKeyEntity::find()
            .order_by_desc(ApiKeyColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Clear the active flag; the row is kept
    pub async fn revoke_api_key(&self, id: Uuid) -> Result<ApiKey> {
        let key = ApiKeyEntity::find_by_id(id)
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::NotFound {
                resource_type: "api_key".to_string(),
                id: id.to_string(),
            })?;

        let mut model = key.into_active_model();
        model.is_active = Set(false);
        let revoked = model.update(self.write_conn()).await?;

        info!(api_key_id = %id, "API key revoked");
        Ok(revoked)
    }

    // ========================================================================
    // Analytics
    // ========================================================================

    /// Enough recent snapshots (newest first) for growth deltas
    pub async fn recent_platform_metrics(&self) -> Result<Vec<PlatformMetric>> {
        PlatformMetricEntity::find()
            .order_by_desc(PlatformMetricColumn::MetricDate)
            .limit((GROWTH_WINDOW + 1) as u64)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Platform totals and health as of `today`
    pub async fn admin_overview(&self, today: NaiveDate) -> Result<AdminOverview> {
        let schools = SchoolEntity::find().all(self.read_conn()).await?;

        let mut by_tier: BTreeMap<SubscriptionTier, u64> = BTreeMap::new();
        for school in &schools {
            *by_tier.entry(school.subscription_tier).or_default() += 1;
        }

        let active_schools = schools
            .iter()
            .filter(|s| s.status == SchoolStatus::Active)
            .count() as u64;

        let total_students = StudentEntity::find().count(self.read_conn()).await?;

        let total_teachers = ProfileEntity::find()
            .filter(ProfileColumn::Role.is_in([Role::Teacher, Role::SchoolAdmin]))
            .count(self.read_conn())
            .await?;

        let present_today = self.count_present_on(today).await?;
        let rate = attendance_rate(present_today, total_students);

        Ok(AdminOverview {
            total_schools: schools.len() as u64,
            active_schools,
            schools_by_tier: by_tier
                .into_iter()
                .map(|(tier, schools)| TierCount { tier, schools })
                .collect(),
            total_students,
            total_teachers,
            present_today,
            attendance_rate: rate,
            health: PlatformHealth::assess(active_schools, rate),
        })
    }
}
