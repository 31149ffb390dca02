//! Profiles, classroom setup, settings and the teacher dashboard

use super::Repository;
use crate::db::models::*;
use crate::domain::attendance::attendance_rate;
use crate::domain::{ClassroomSettings, ClassroomSetup};
use crate::errors::{AppError, Result};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

pub const USERNAME_TAKEN: &str = "Username already taken. Please choose another.";

/// Teacher dashboard numbers
#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub classroom: Classroom,
    pub total_students: u64,
    pub present_today: u64,
    pub total_assignments: u64,
    pub attendance_rate: u32,
}

impl Repository {
    // ========================================================================
    // Profile Operations
    // ========================================================================

    /// Find profile by user ID
    pub async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        ProfileEntity::find_by_id(id)
            .one(self.write_conn())
            .await
            .map_err(Into::into)
    }

    /// Find the caller's profile, creating a `teacher` profile on first sign-in
    pub async fn ensure_profile(&self, id: Uuid, email: &str) -> Result<Profile> {
        if let Some(profile) = self.find_profile(id).await? {
            return Ok(profile);
        }

        let now = Utc::now();
        let profile = ProfileActiveModel {
            id: Set(id),
            email: Set(email.to_string()),
            full_name: Set(None),
            role: Set(Role::Teacher),
            classroom_id: Set(None),
            school_id: Set(None),
            billing_customer_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Concurrent first requests race on the primary key
        ProfileEntity::insert(profile)
            .on_conflict(OnConflict::column(ProfileColumn::Id).do_nothing().to_owned())
            .exec_without_returning(self.write_conn())
            .await?;

        info!(user_id = %id, "Profile created");

        self.find_profile(id).await?.ok_or_else(|| AppError::Internal {
            message: format!("Profile {} missing after insert", id),
        })
    }

    // ========================================================================
    // Classroom Operations
    // ========================================================================

    /// Find classroom by ID
    pub async fn find_classroom(&self, id: Uuid) -> Result<Option<Classroom>> {
        ClassroomEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Classroom by ID, or `NotFound`
    pub async fn get_classroom(&self, id: Uuid) -> Result<Classroom> {
        self.find_classroom(id).await?.ok_or_else(|| AppError::NotFound {
            resource_type: "classroom".to_string(),
            id: id.to_string(),
        })
    }

    /// Find classroom by public username (exact match)
    pub async fn find_classroom_by_username(&self, username: &str) -> Result<Option<Classroom>> {
        ClassroomEntity::find()
            .filter(ClassroomColumn::Username.eq(username))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Create the caller's classroom and link it to their profile
    pub async fn create_classroom(
        &self,
        teacher_id: Uuid,
        setup: &ClassroomSetup,
        username: &str,
    ) -> Result<Classroom> {
        let txn = self.write_conn().begin().await?;

        let taken = ClassroomEntity::find()
            .filter(ClassroomColumn::Username.eq(username))
            .one(&txn)
            .await?
            .is_some();
        if taken {
            return Err(AppError::Duplicate {
                message: USERNAME_TAKEN.to_string(),
            });
        }

        let profile = ProfileEntity::find_by_id(teacher_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: "Profile not found".to_string(),
            })?;
        if profile.classroom_id.is_some() {
            return Err(AppError::Duplicate {
                message: "You already have a classroom.".to_string(),
            });
        }

        let now = Utc::now();
        let classroom = ClassroomActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(setup.classroom_name.trim().to_string()),
            username: Set(username.to_string()),
            grade_level: Set(setup.grade_level.trim().to_string()),
            academic_year: Set(setup.academic_year.trim().to_string()),
            teacher_id: Set(teacher_id),
            teacher_name: Set(setup.teacher_name.trim().to_string()),
            teacher_email: Set(setup.teacher_email.clone()),
            teacher_phone: Set(setup.teacher_phone.clone()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| match AppError::from(e) {
            // Lost a race with another setup for the same username
            AppError::Duplicate { .. } => AppError::Duplicate {
                message: USERNAME_TAKEN.to_string(),
            },
            other => other,
        })?;

        let mut profile = profile.into_active_model();
        profile.classroom_id = Set(Some(classroom.id));
        profile.full_name = Set(Some(setup.teacher_name.trim().to_string()));
        if let Some(email) = &setup.teacher_email {
            profile.email = Set(email.clone());
        }
        profile.updated_at = Set(now);
        profile.update(&txn).await?;

        txn.commit().await?;

        info!(
            classroom_id = %classroom.id,
            teacher_id = %teacher_id,
            username = %classroom.username,
            "Classroom created"
        );

        Ok(classroom)
    }

    /// Update classroom name and teacher contact details
    pub async fn update_classroom_settings(
        &self,
        classroom_id: Uuid,
        settings: ClassroomSettings,
    ) -> Result<Classroom> {
        let classroom = ClassroomEntity::find_by_id(classroom_id)
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::NotFound {
                resource_type: "classroom".to_string(),
                id: classroom_id.to_string(),
            })?;

        let mut active = classroom.into_active_model();
        if let Some(name) = settings.name {
            active.name = Set(name);
        }
        if let Some(grade_level) = settings.grade_level {
            active.grade_level = Set(grade_level);
        }
        if let Some(academic_year) = settings.academic_year {
            active.academic_year = Set(academic_year);
        }
        if let Some(teacher_name) = settings.teacher_name {
            active.teacher_name = Set(teacher_name);
        }
        if let Some(email) = settings.teacher_email {
            active.teacher_email = Set(non_blank(email));
        }
        if let Some(phone) = settings.teacher_phone {
            active.teacher_phone = Set(non_blank(phone));
        }

        let updated = active.update(self.write_conn()).await?;
        info!(classroom_id = %classroom_id, "Classroom settings updated");
        Ok(updated)
    }

    /// Counts shown on the teacher dashboard
    pub async fn dashboard_overview(
        &self,
        classroom_id: Uuid,
        today: NaiveDate,
    ) -> Result<DashboardOverview> {
        let classroom = self.get_classroom(classroom_id).await?;

        let total_students = StudentEntity::find()
            .filter(StudentColumn::ClassroomId.eq(classroom_id))
            .count(self.read_conn())
            .await?;

        let present_today = AttendanceEntity::find()
            .filter(AttendanceColumn::ClassroomId.eq(classroom_id))
            .filter(AttendanceColumn::Date.eq(today))
            .filter(AttendanceColumn::Status.eq(AttendanceStatus::Present))
            .count(self.read_conn())
            .await?;

        let total_assignments = AssignmentEntity::find()
            .filter(AssignmentColumn::ClassroomId.eq(classroom_id))
            .count(self.read_conn())
            .await?;

        Ok(DashboardOverview {
            classroom,
            total_students,
            present_today,
            total_assignments,
            attendance_rate: attendance_rate(present_today, total_students),
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
