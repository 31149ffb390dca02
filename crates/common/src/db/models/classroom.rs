//! Classroom entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "classrooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    /// Public routing key, immutable after setup
    #[sea_orm(column_type = "Text", unique)]
    pub username: String,

    #[sea_orm(column_type = "Text")]
    pub grade_level: String,

    #[sea_orm(column_type = "Text")]
    pub academic_year: String,

    pub teacher_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub teacher_name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub teacher_email: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub teacher_phone: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::TeacherId",
        to = "super::profile::Column::Id"
    )]
    Teacher,

    #[sea_orm(has_many = "super::student::Entity")]
    Students,

    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignments,

    #[sea_orm(has_many = "super::notice::Entity")]
    Notices,

    #[sea_orm(has_many = "super::timetable::Entity")]
    Timetable,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::notice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notices.def()
    }
}

impl Related<super::timetable::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Timetable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
