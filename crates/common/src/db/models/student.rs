//! Student entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Generated school identifier (e.g. AMLE123456)
    #[sea_orm(column_type = "Text")]
    pub student_id: String,

    /// Generated portal login code, unique within the classroom
    #[sea_orm(column_type = "Text")]
    pub login_id: String,

    #[sea_orm(column_type = "Text")]
    pub first_name: String,

    #[sea_orm(column_type = "Text")]
    pub last_name: String,

    pub date_of_birth: Date,

    #[sea_orm(column_type = "Text", nullable)]
    pub gender: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub parent_guardian_name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub parent_guardian_email: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub parent_guardian_phone: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub emergency_contact_name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub emergency_contact_phone: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub medical_conditions: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub photo_url: Option<String>,

    pub classroom_id: Uuid,

    pub teacher_id: Uuid,

    pub created_at: DateTimeUtc,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classroom::Entity",
        from = "Column::ClassroomId",
        to = "super::classroom::Column::Id",
        on_delete = "Cascade"
    )]
    Classroom,

    #[sea_orm(has_many = "super::grade::Entity")]
    Grades,

    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::classroom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grades.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
