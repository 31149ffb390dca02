//! Schema bootstrap from the entity definitions
//!
//! Tables are created in foreign-key order. Composite natural keys are not
//! expressible on the entities, so they are added as unique indexes.

use super::models::*;
use crate::errors::Result;
use sea_orm::{
    sea_query::{Index, IndexCreateStatement},
    ConnectionTrait, DatabaseConnection, EntityTrait, Schema,
};
use tracing::info;

/// Create every table and unique index that does not exist yet
pub async fn bootstrap(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, ProfileEntity).await?;
    create_table(db, &schema, ClassroomEntity).await?;
    create_table(db, &schema, StudentEntity).await?;
    create_table(db, &schema, AssignmentEntity).await?;
    create_table(db, &schema, GradeEntity).await?;
    create_table(db, &schema, AttendanceEntity).await?;
    create_table(db, &schema, NoticeEntity).await?;
    create_table(db, &schema, TimetableEntity).await?;
    create_table(db, &schema, SchoolEntity).await?;
    create_table(db, &schema, AnnouncementEntity).await?;
    create_table(db, &schema, ApiKeyEntity).await?;
    create_table(db, &schema, AuditLogEntity).await?;
    create_table(db, &schema, PlatformMetricEntity).await?;

    for index in unique_indexes() {
        db.execute(db.get_database_backend().build(&index)).await?;
    }

    info!("Database schema ready");
    Ok(())
}

async fn create_table<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<()> {
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(db.get_database_backend().build(&statement)).await?;
    Ok(())
}

fn unique_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_students_classroom_login")
            .table(StudentEntity)
            .col(StudentColumn::ClassroomId)
            .col(StudentColumn::LoginId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_attendance_student_date")
            .table(AttendanceEntity)
            .col(AttendanceColumn::StudentId)
            .col(AttendanceColumn::Date)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_grades_assignment_student")
            .table(GradeEntity)
            .col(GradeColumn::AssignmentId)
            .col(GradeColumn::StudentId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_attendance_classroom_date")
            .table(AttendanceEntity)
            .col(AttendanceColumn::ClassroomId)
            .col(AttendanceColumn::Date)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_platform_metrics_date")
            .table(PlatformMetricEntity)
            .col(PlatformMetricColumn::MetricDate)
            .if_not_exists()
            .to_owned(),
    ]
}
