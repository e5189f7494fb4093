//! SeaORM Entity for learning_materials table.
//! A course document uploaded by a user and, once processed, indexed by the RAG service.

use crate::material_type::MaterialType;
use crate::processing_status::ProcessingStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = entity::learning_materials::Model)]
#[sea_orm(schema_name = "learning_assistant", table_name = "learning_materials")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    #[serde(skip_deserializing)]
    pub user_id: Id,

    /// Unassigned materials have no conversation
    #[schema(value_type = Option<String>, format = Uuid)]
    pub conversation_id: Option<Id>,

    pub course_name: String,

    pub material_type: MaterialType,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Object storage key of the uploaded file
    pub file_path: String,

    /// Size of the uploaded file in bytes
    pub file_size: i64,

    pub original_filename: String,

    #[serde(skip_deserializing)]
    pub processing_status: ProcessingStatus,

    #[serde(skip_deserializing)]
    pub processing_error: Option<String>,

    #[serde(skip_deserializing)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub processed_at: Option<DateTimeWithTimeZone>,

    /// Number of vector documents the RAG service produced
    #[serde(skip_deserializing)]
    pub vector_document_count: Option<i32>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,

    #[sea_orm(
        belongs_to = "super::conversations::Entity",
        from = "Column::ConversationId",
        to = "super::conversations::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Conversations,

    #[sea_orm(has_many = "super::questions::Entity")]
    Questions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::conversations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conversations.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
