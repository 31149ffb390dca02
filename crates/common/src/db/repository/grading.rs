//! Assignments and grade entry

use super::{students_in_classroom, Repository};
use crate::db::models::*;
use crate::domain::grading::{band_for, compute_percentage, validate_marks, ResolvedAssignment};
use crate::errors::{AppError, Result};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::info;
use uuid::Uuid;

/// A stored grade with its band label resolved against the assignment scale
#[derive(Debug, Clone, Serialize)]
pub struct GradeRow {
    #[serde(flatten)]
    pub grade: Grade,
    pub band: Option<String>,
}

/// One line of a student's progress report
#[derive(Debug, Clone, Serialize)]
pub struct StudentGradeRow {
    pub assignment_id: Uuid,
    pub title: String,
    pub subject: String,
    pub exam_date: NaiveDate,
    pub total_marks: f64,
    pub marks_obtained: f64,
    pub percentage: f64,
    pub band: Option<String>,
    pub passed: bool,
}

impl Repository {
    // ========================================================================
    // Assignment Operations
    // ========================================================================

    /// Create an assignment in the classroom
    pub async fn create_assignment(
        &self,
        classroom_id: Uuid,
        assignment: ResolvedAssignment,
    ) -> Result<Assignment> {
        let created = AssignmentActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(assignment.title),
            subject: Set(assignment.subject),
            total_marks: Set(assignment.total_marks),
            pass_marks: Set(assignment.pass_marks),
            exam_date: Set(assignment.exam_date),
            classroom_id: Set(classroom_id),
            grading_scale: Set(assignment.grading_scale),
            created_at: Set(Utc::now()),
        }
        .insert(self.write_conn())
        .await?;

        info!(classroom_id = %classroom_id, assignment_id = %created.id, "Assignment created");
        Ok(created)
    }

    /// Assignments of a classroom, most recent exam first
    pub async fn list_assignments(&self, classroom_id: Uuid) -> Result<Vec<Assignment>> {
        AssignmentEntity::find()
            .filter(AssignmentColumn::ClassroomId.eq(classroom_id))
            .order_by_desc(AssignmentColumn::ExamDate)
            .order_by_desc(AssignmentColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn count_assignments(&self, classroom_id: Uuid) -> Result<u64> {
        AssignmentEntity::find()
            .filter(AssignmentColumn::ClassroomId.eq(classroom_id))
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// One assignment, constrained to the classroom
    pub async fn get_assignment(&self, classroom_id: Uuid, id: Uuid) -> Result<Assignment> {
        AssignmentEntity::find_by_id(id)
            .filter(AssignmentColumn::ClassroomId.eq(classroom_id))
            .one(self.read_conn())
            .await?
            .ok_or_else(|| AppError::AssignmentNotFound { id: id.to_string() })
    }

    /// Delete an assignment and its grades
    pub async fn delete_assignment(&self, classroom_id: Uuid, id: Uuid) -> Result<()> {
        let txn = self.write_conn().begin().await?;

        let exists = AssignmentEntity::find_by_id(id)
            .filter(AssignmentColumn::ClassroomId.eq(classroom_id))
            .one(&txn)
            .await?
            .is_some();
        if !exists {
            return Err(AppError::AssignmentNotFound { id: id.to_string() });
        }

        GradeEntity::delete_many()
            .filter(GradeColumn::AssignmentId.eq(id))
            .exec(&txn)
            .await?;
        AssignmentEntity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!(classroom_id = %classroom_id, assignment_id = %id, "Assignment deleted");
        Ok(())
    }

    // ========================================================================
    // Grade Operations
    // ========================================================================

    /// Replace the grades of an assignment with `marks` (student id -> marks)
    ///
    /// Percentages are computed from the stored assignment total. Grades of
    /// students missing from `marks` are removed; the rest are upserted on
    /// (assignment_id, student_id). One transaction.
    pub async fn save_grades(
        &self,
        classroom_id: Uuid,
        assignment_id: Uuid,
        marks: &HashMap<Uuid, f64>,
    ) -> Result<Vec<Grade>> {
        for value in marks.values() {
            validate_marks(*value)?;
        }
        let student_ids: HashSet<Uuid> = marks.keys().copied().collect();

        let txn = self.write_conn().begin().await?;

        let assignment = AssignmentEntity::find_by_id(assignment_id)
            .filter(AssignmentColumn::ClassroomId.eq(classroom_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::AssignmentNotFound {
                id: assignment_id.to_string(),
            })?;

        let students = students_in_classroom(&txn, classroom_id, &student_ids).await?;

        let mut stale = GradeEntity::delete_many().filter(GradeColumn::AssignmentId.eq(assignment_id));
        if !student_ids.is_empty() {
            stale = stale.filter(GradeColumn::StudentId.is_not_in(student_ids.iter().copied()));
        }
        stale.exec(&txn).await?;

        let now = Utc::now();
        for (student_id, marks_obtained) in marks {
            let Some(student) = students.get(student_id) else {
                continue;
            };

            let row = GradeActiveModel {
                id: Set(Uuid::new_v4()),
                classroom_id: Set(classroom_id),
                assignment_id: Set(assignment_id),
                student_id: Set(*student_id),
                student_name: Set(student.full_name()),
                marks_obtained: Set(*marks_obtained),
                percentage: Set(compute_percentage(*marks_obtained, assignment.total_marks)),
                created_at: Set(now),
            };

            GradeEntity::insert(row)
                .on_conflict(
                    OnConflict::columns([GradeColumn::AssignmentId, GradeColumn::StudentId])
                        .update_columns([
                            GradeColumn::StudentName,
                            GradeColumn::MarksObtained,
                            GradeColumn::Percentage,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        crate::metrics::record_grade_save(marks.len());
        info!(
            classroom_id = %classroom_id,
            assignment_id = %assignment_id,
            graded = marks.len(),
            "Grades saved"
        );

        GradeEntity::find()
            .filter(GradeColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(GradeColumn::StudentName)
            .all(self.write_conn())
            .await
            .map_err(Into::into)
    }

    /// Grades of an assignment with band labels
    pub async fn list_grades(
        &self,
        classroom_id: Uuid,
        assignment_id: Uuid,
    ) -> Result<(Assignment, Vec<GradeRow>)> {
        let assignment = self.get_assignment(classroom_id, assignment_id).await?;

        let grades = GradeEntity::find()
            .filter(GradeColumn::ClassroomId.eq(classroom_id))
            .filter(GradeColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(GradeColumn::StudentName)
            .all(self.read_conn())
            .await?;

        let rows = grades
            .into_iter()
            .map(|grade| GradeRow {
                band: band_for(grade.percentage, &assignment.grading_scale).map(String::from),
                grade,
            })
            .collect();

        Ok((assignment, rows))
    }

    /// A student's grades joined with their assignments, newest exam first
    pub async fn student_grades(&self, classroom_id: Uuid, student_id: Uuid) -> Result<Vec<StudentGradeRow>> {
        let rows = GradeEntity::find()
            .filter(GradeColumn::ClassroomId.eq(classroom_id))
            .filter(GradeColumn::StudentId.eq(student_id))
            .find_also_related(AssignmentEntity)
            .all(self.read_conn())
            .await?;

        let mut report: Vec<StudentGradeRow> = rows
            .into_iter()
            .filter_map(|(grade, assignment)| {
                let assignment = assignment?;
                Some(StudentGradeRow {
                    assignment_id: assignment.id,
                    band: band_for(grade.percentage, &assignment.grading_scale).map(String::from),
                    passed: grade.marks_obtained >= assignment.pass_marks,
                    title: assignment.title,
                    subject: assignment.subject,
                    exam_date: assignment.exam_date,
                    total_marks: assignment.total_marks,
                    marks_obtained: grade.marks_obtained,
                    percentage: grade.percentage,
                })
            })
            .collect();

        report.sort_by(|a, b| b.exam_date.cmp(&a.exam_date));
        Ok(report)
    }
}
