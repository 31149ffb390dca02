//! Profile entity: one row per identity-provider account

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "teacher")]
    Teacher,
    #[sea_orm(string_value = "school_admin")]
    SchoolAdmin,
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
    #[sea_orm(string_value = "staff")]
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::SchoolAdmin => "school_admin",
            Role::SuperAdmin => "super_admin",
            Role::Staff => "staff",
        }
    }

    /// Counted as teaching staff in platform totals
    pub fn is_teaching(&self) -> bool {
        matches!(self, Role::Teacher | Role::SchoolAdmin)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Identity provider user id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub email: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub full_name: Option<String>,

    pub role: Role,

    /// Set once by classroom setup; plain column to keep the
    /// profiles <-> classrooms reference acyclic
    pub classroom_id: Option<Uuid>,

    pub school_id: Option<Uuid>,

    #[sea_orm(column_type = "Text", nullable)]
    pub billing_customer_id: Option<String>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::classroom::Entity")]
    Classrooms,
}

impl Related<super::classroom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classrooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
