use crate::difficulty::Difficulty;
use crate::json_list::StringList;
use crate::question_type::QuestionType;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A generated question tied to the material it was drawn from, with attempt counters.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = entity::questions::Model)]
#[sea_orm(schema_name = "learning_assistant", table_name = "questions")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    #[serde(skip_deserializing)]
    pub user_id: Id,

    #[schema(value_type = Option<String>, format = Uuid)]
    pub conversation_id: Option<Id>,

    #[schema(value_type = String, format = Uuid)]
    pub material_id: Id,

    #[sea_orm(column_type = "Text")]
    pub question: String,

    pub question_type: QuestionType,

    #[sea_orm(column_type = "JsonBinary")]
    #[schema(value_type = Vec<String>)]
    pub options: StringList,

    #[sea_orm(column_type = "Text")]
    pub correct_answer: String,

    #[sea_orm(column_type = "Text")]
    pub explanation: String,

    pub difficulty: Difficulty,

    #[sea_orm(column_type = "JsonBinary")]
    #[schema(value_type = Vec<String>)]
    pub tags: StringList,

    #[sea_orm(column_type = "Text", nullable)]
    pub source_summary: Option<String>,

    #[serde(skip_deserializing)]
    pub attempts: i32,

    #[serde(skip_deserializing)]
    pub correct_attempts: i32,

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
        belongs_to = "super::learning_materials::Entity",
        from = "Column::MaterialId",
        to = "super::learning_materials::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    LearningMaterials,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::learning_materials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LearningMaterials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
