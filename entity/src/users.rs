//! SeaORM Entity for the users table.
//! Users are created on their first Google sign in.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = entity::users::Model)]
#[sea_orm(schema_name = "learning_assistant", table_name = "users")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    /// Stable Google account identifier (`sub`)
    #[serde(skip_serializing)]
    #[sea_orm(unique)]
    pub google_id: String,

    #[sea_orm(unique)]
    pub email: String,

    pub name: String,

    pub avatar: Option<String>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::conversations::Entity")]
    Conversations,
    #[sea_orm(has_many = "super::learning_materials::Entity")]
    LearningMaterials,
}

impl Related<super::conversations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conversations.def()
    }
}

impl Related<super::learning_materials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LearningMaterials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
