//! Weekly timetable

use super::Repository;
use crate::db::models::*;
use crate::domain::TimetableEntryInput;
use crate::errors::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use tracing::info;
use uuid::Uuid;

impl Repository {
    /// Whole week, Monday first, then by start time
    pub async fn list_timetable(&self, classroom_id: Uuid) -> Result<Vec<TimetableEntry>> {
        let mut entries = TimetableEntity::find()
            .filter(TimetableColumn::ClassroomId.eq(classroom_id))
            .order_by_asc(TimetableColumn::StartTime)
            .all(self.read_conn())
            .await?;

        entries.sort_by(|a, b| {
            a.day_of_week
                .cmp(&b.day_of_week)
                .then(a.start_time.cmp(&b.start_time))
        });
        Ok(entries)
    }

    /// One day's periods ordered by start time
    pub async fn timetable_for_day(
        &self,
        classroom_id: Uuid,
        day: DayOfWeek,
    ) -> Result<Vec<TimetableEntry>> {
        TimetableEntity::find()
            .filter(TimetableColumn::ClassroomId.eq(classroom_id))
            .filter(TimetableColumn::DayOfWeek.eq(day))
            .order_by_asc(TimetableColumn::StartTime)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Replace the whole week in one transaction
    pub async fn replace_timetable(
        &self,
        classroom_id: Uuid,
        entries: Vec<TimetableEntryInput>,
    ) -> Result<Vec<TimetableEntry>> {
        let txn = self.write_conn().begin().await?;

        TimetableEntity::delete_many()
            .filter(TimetableColumn::ClassroomId.eq(classroom_id))
            .exec(&txn)
            .await?;

        let now = Utc::now();
        let mut saved = Vec::with_capacity(entries.len());
        for entry in entries {
            let row = TimetableActiveModel {
                id: Set(Uuid::new_v4()),
                classroom_id: Set(classroom_id),
                day_of_week: Set(entry.day_of_week),
                start_time: Set(entry.start_time),
                end_time: Set(entry.end_time),
                subject: Set(entry.subject.trim().to_string()),
                teacher_name: Set(entry.teacher_name.trim().to_string()),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
            saved.push(row);
        }

        txn.commit().await?;

        info!(classroom_id = %classroom_id, periods = saved.len(), "Timetable replaced");

        saved.sort_by(|a, b| {
            a.day_of_week
                .cmp(&b.day_of_week)
                .then(a.start_time.cmp(&b.start_time))
        });
        Ok(saved)
    }
}
