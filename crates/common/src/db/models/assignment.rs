//! Assignment entity with its grading scale

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// A named percentage range, e.g. "A+" for 90..=100
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub grade: String,
    pub min_percentage: f64,
    pub max_percentage: f64,
}

impl GradeBand {
    pub fn new(grade: &str, min_percentage: f64, max_percentage: f64) -> Self {
        Self {
            grade: grade.to_string(),
            min_percentage,
            max_percentage,
        }
    }

    pub fn contains(&self, percentage: f64) -> bool {
        percentage >= self.min_percentage && percentage <= self.max_percentage
    }
}

/// Ordered grading scale stored as a JSON column
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct GradeBands(pub Vec<GradeBand>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub subject: String,

    #[sea_orm(column_type = "Double")]
    pub total_marks: f64,

    #[sea_orm(column_type = "Double")]
    pub pass_marks: f64,

    pub exam_date: Date,

    pub classroom_id: Uuid,

    #[sea_orm(column_type = "Json")]
    pub grading_scale: GradeBands,

    pub created_at: DateTimeUtc,
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

impl ActiveModelBehavior for ActiveModel {}
