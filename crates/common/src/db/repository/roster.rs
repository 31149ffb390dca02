//! Student roster operations

use super::Repository;
use crate::db::models::*;
use crate::domain::{generate_login_id, generate_student_id, StudentInput, StudentUpdate};
use crate::errors::{AppError, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl Repository {
    /// Register a student in the classroom with generated identifiers
    ///
    /// A login-id collision inside the classroom surfaces as `Duplicate`.
    pub async fn create_student(&self, classroom: &Classroom, input: StudentInput) -> Result<Student> {
        let (login_id, student_id) = {
            let mut rng = rand::thread_rng();
            (
                generate_login_id(&input.first_name, &input.last_name, &mut rng),
                generate_student_id(&input.first_name, &input.last_name, &mut rng),
            )
        };

        let student = StudentActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            login_id: Set(login_id),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            date_of_birth: Set(input.date_of_birth),
            gender: Set(input.gender),
            parent_guardian_name: Set(input.parent_guardian_name.trim().to_string()),
            parent_guardian_email: Set(input.parent_guardian_email),
            parent_guardian_phone: Set(input.parent_guardian_phone.trim().to_string()),
            emergency_contact_name: Set(input.emergency_contact_name),
            emergency_contact_phone: Set(input.emergency_contact_phone),
            medical_conditions: Set(input.medical_conditions),
            address: Set(input.address),
            photo_url: Set(input.photo_url),
            classroom_id: Set(classroom.id),
            teacher_id: Set(classroom.teacher_id),
            created_at: Set(Utc::now()),
        }
        .insert(self.write_conn())
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Duplicate { .. } => AppError::Duplicate {
                message: "Generated login ID is already in use. Please try again.".to_string(),
            },
            other => other,
        })?;

        info!(
            classroom_id = %classroom.id,
            student_id = %student.id,
            login_id = %student.login_id,
            "Student registered"
        );

        Ok(student)
    }

    /// All students of a classroom ordered by last name, then first name
    pub async fn list_students(&self, classroom_id: Uuid) -> Result<Vec<Student>> {
        StudentEntity::find()
            .filter(StudentColumn::ClassroomId.eq(classroom_id))
            .order_by_asc(StudentColumn::LastName)
            .order_by_asc(StudentColumn::FirstName)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Count students in a classroom
    pub async fn count_students(&self, classroom_id: Uuid) -> Result<u64> {
        StudentEntity::find()
            .filter(StudentColumn::ClassroomId.eq(classroom_id))
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// One student, constrained to the classroom
    pub async fn get_student(&self, classroom_id: Uuid, id: Uuid) -> Result<Student> {
        StudentEntity::find_by_id(id)
            .filter(StudentColumn::ClassroomId.eq(classroom_id))
            .one(self.read_conn())
            .await?
            .ok_or_else(|| AppError::StudentNotFound { id: id.to_string() })
    }

    /// Portal lookup; `login_id` is compared upper-cased
    pub async fn find_student_by_login(
        &self,
        classroom_id: Uuid,
        login_id: &str,
    ) -> Result<Option<Student>> {
        StudentEntity::find()
            .filter(StudentColumn::ClassroomId.eq(classroom_id))
            .filter(StudentColumn::LoginId.eq(login_id.trim().to_uppercase()))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Apply a partial update to a student in the classroom
    pub async fn update_student(
        &self,
        classroom_id: Uuid,
        id: Uuid,
        update: StudentUpdate,
    ) -> Result<Student> {
        let student = StudentEntity::find_by_id(id)
            .filter(StudentColumn::ClassroomId.eq(classroom_id))
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::StudentNotFound { id: id.to_string() })?;

        let mut active = student.into_active_model();
        if let Some(v) = update.first_name {
            active.first_name = Set(v.trim().to_string());
        }
        if let Some(v) = update.last_name {
            active.last_name = Set(v.trim().to_string());
        }
        if let Some(v) = update.date_of_birth {
            active.date_of_birth = Set(v);
        }
        if let Some(v) = update.parent_guardian_name {
            active.parent_guardian_name = Set(v.trim().to_string());
        }
        if let Some(v) = update.parent_guardian_phone {
            active.parent_guardian_phone = Set(v.trim().to_string());
        }
        if let Some(v) = update.gender {
            active.gender = Set(blank_to_none(v));
        }
        if let Some(v) = update.parent_guardian_email {
            active.parent_guardian_email = Set(blank_to_none(v));
        }
        if let Some(v) = update.emergency_contact_name {
            active.emergency_contact_name = Set(blank_to_none(v));
        }
        if let Some(v) = update.emergency_contact_phone {
            active.emergency_contact_phone = Set(blank_to_none(v));
        }
        if let Some(v) = update.medical_conditions {
            active.medical_conditions = Set(blank_to_none(v));
        }
        if let Some(v) = update.address {
            active.address = Set(blank_to_none(v));
        }
        if let Some(v) = update.photo_url {
            active.photo_url = Set(blank_to_none(v));
        }

        let updated = active.update(self.write_conn()).await?;
        info!(classroom_id = %classroom_id, student_id = %id, "Student updated");
        Ok(updated)
    }

    /// Delete a student together with their grades and attendance
    pub async fn delete_student(&self, classroom_id: Uuid, id: Uuid) -> Result<()> {
        let txn = self.write_conn().begin().await?;

        let exists = StudentEntity::find_by_id(id)
            .filter(StudentColumn::ClassroomId.eq(classroom_id))
            .one(&txn)
            .await?
            .is_some();
        if !exists {
            return Err(AppError::StudentNotFound { id: id.to_string() });
        }

        let grades = GradeEntity::delete_many()
            .filter(GradeColumn::StudentId.eq(id))
            .exec(&txn)
            .await?;
        let attendance = AttendanceEntity::delete_many()
            .filter(AttendanceColumn::StudentId.eq(id))
            .exec(&txn)
            .await?;
        StudentEntity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!(
            classroom_id = %classroom_id,
            student_id = %id,
            grades_removed = grades.rows_affected,
            attendance_removed = attendance.rows_affected,
            "Student deleted"
        );

        Ok(())
    }
}
