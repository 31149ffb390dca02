//! School entity (platform tenant managed by super admins)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[sea_orm(string_value = "free")]
    Free,
    #[sea_orm(string_value = "basic")]
    Basic,
    #[sea_orm(string_value = "premium")]
    Premium,
    #[sea_orm(string_value = "enterprise")]
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum SchoolStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub admin_name: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub admin_email: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub phone: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,

    pub subscription_tier: SubscriptionTier,

    pub max_students: i32,

    pub max_teachers: i32,

    pub status: SchoolStatus,

    #[sea_orm(column_type = "Text")]
    pub billing_email: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
