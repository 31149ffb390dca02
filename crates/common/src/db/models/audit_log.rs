//! Audit log entity for admin actions

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Acting user
    pub user_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub action: String,

    #[sea_orm(column_type = "Text")]
    pub resource_type: String,

    #[sea_orm(column_type = "Text")]
    pub resource_id: String,

    #[sea_orm(column_type = "Json")]
    pub details: Json,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
