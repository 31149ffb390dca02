//! Attendance load/save and per-student history

use super::{students_in_classroom, Repository};
use crate::db::models::*;
use crate::domain::AttendanceSheet;
use crate::errors::Result;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

impl Repository {
    /// The classroom's attendance sheet for one date
    pub async fn load_attendance(&self, classroom_id: Uuid, date: NaiveDate) -> Result<AttendanceSheet> {
        let rows = AttendanceEntity::find()
            .filter(AttendanceColumn::ClassroomId.eq(classroom_id))
            .filter(AttendanceColumn::Date.eq(date))
            .all(self.read_conn())
            .await?;

        Ok(AttendanceSheet::from_statuses(
            rows.into_iter().map(|r| (r.student_id, r.status)).collect(),
        ))
    }

    /// Replace the classroom's attendance for a date with `sheet`
    ///
    /// Rows for students missing from the sheet are removed and the rest are
    /// upserted on (student_id, date), all in one transaction. Saving the same
    /// sheet twice leaves the same rows.
    pub async fn save_attendance(
        &self,
        classroom_id: Uuid,
        date: NaiveDate,
        sheet: &AttendanceSheet,
    ) -> Result<usize> {
        let student_ids: HashSet<Uuid> = sheet.statuses().keys().copied().collect();

        let txn = self.write_conn().begin().await?;

        students_in_classroom(&txn, classroom_id, &student_ids).await?;

        let mut stale = AttendanceEntity::delete_many()
            .filter(AttendanceColumn::ClassroomId.eq(classroom_id))
            .filter(AttendanceColumn::Date.eq(date));
        if !student_ids.is_empty() {
            stale = stale.filter(AttendanceColumn::StudentId.is_not_in(student_ids.iter().copied()));
        }
        let removed = stale.exec(&txn).await?;

        let now = Utc::now();
        for (student_id, status) in sheet.statuses() {
            let row = AttendanceActiveModel {
                id: Set(Uuid::new_v4()),
                classroom_id: Set(classroom_id),
                student_id: Set(*student_id),
                date: Set(date),
                status: Set(*status),
                created_at: Set(now),
            };

            AttendanceEntity::insert(row)
                .on_conflict(
                    OnConflict::columns([AttendanceColumn::StudentId, AttendanceColumn::Date])
                        .update_column(AttendanceColumn::Status)
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        crate::metrics::record_attendance_save(sheet.len());
        info!(
            classroom_id = %classroom_id,
            date = %date,
            marked = sheet.len(),
            cleared = removed.rows_affected,
            "Attendance saved"
        );

        Ok(sheet.len())
    }

    /// Attendance history of one student, newest first
    pub async fn student_attendance(&self, classroom_id: Uuid, student_id: Uuid) -> Result<Vec<Attendance>> {
        AttendanceEntity::find()
            .filter(AttendanceColumn::ClassroomId.eq(classroom_id))
            .filter(AttendanceColumn::StudentId.eq(student_id))
            .order_by_desc(AttendanceColumn::Date)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Platform-wide count of `present` rows on a date
    pub async fn count_present_on(&self, date: NaiveDate) -> Result<u64> {
        AttendanceEntity::find()
            .filter(AttendanceColumn::Date.eq(date))
            .filter(AttendanceColumn::Status.eq(AttendanceStatus::Present))
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }
}
