//! Classroom notices

use super::Repository;
use crate::db::models::*;
use crate::domain::{NoticeInput, NoticeUpdate};
use crate::errors::{AppError, Result};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

impl Repository {
    /// Post a notice; the date defaults to `today`
    pub async fn create_notice(
        &self,
        classroom_id: Uuid,
        input: NoticeInput,
        today: NaiveDate,
    ) -> Result<Notice> {
        let notice = NoticeActiveModel {
            id: Set(Uuid::new_v4()),
            classroom_id: Set(classroom_id),
            title: Set(input.title.trim().to_string()),
            content: Set(input.content),
            date: Set(input.date.unwrap_or(today)),
            created_at: Set(Utc::now()),
        }
        .insert(self.write_conn())
        .await?;

        info!(classroom_id = %classroom_id, notice_id = %notice.id, "Notice posted");
        Ok(notice)
    }

    /// Notices of a classroom, newest first
    pub async fn list_notices(&self, classroom_id: Uuid) -> Result<Vec<Notice>> {
        NoticeEntity::find()
            .filter(NoticeColumn::ClassroomId.eq(classroom_id))
            .order_by_desc(NoticeColumn::Date)
            .order_by_desc(NoticeColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    pub async fn update_notice(
        &self,
        classroom_id: Uuid,
        id: Uuid,
        update: NoticeUpdate,
    ) -> Result<Notice> {
        let notice = NoticeEntity::find_by_id(id)
            .filter(NoticeColumn::ClassroomId.eq(classroom_id))
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::NotFound {
                resource_type: "notice".to_string(),
                id: id.to_string(),
            })?;

        let mut active = notice.into_active_model();
        if let Some(title) = update.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(content) = update.content {
            active.content = Set(content);
        }
        if let Some(date) = update.date {
            active.date = Set(date);
        }

        active.update(self.write_conn()).await.map_err(Into::into)
    }

    pub async fn delete_notice(&self, classroom_id: Uuid, id: Uuid) -> Result<()> {
        let result = NoticeEntity::delete_many()
            .filter(NoticeColumn::Id.eq(id))
            .filter(NoticeColumn::ClassroomId.eq(classroom_id))
            .exec(self.write_conn())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound {
                resource_type: "notice".to_string(),
                id: id.to_string(),
            });
        }

        info!(classroom_id = %classroom_id, notice_id = %id, "Notice deleted");
        Ok(())
    }
}
