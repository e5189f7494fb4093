//! SeaORM Entity for practice_quizzes table.
//!
//! A quiz keeps its questions and every graded submission inline as `jsonb`
//! documents; they are only ever read and written together with the quiz.

use crate::difficulty::Difficulty;
use crate::json_list::IdList;
use crate::question_type::QuestionType;
use crate::quiz_status::QuizStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,
    pub order: i32,
    pub question: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source_summary: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSummary {
    pub correct: i32,
    pub total: i32,
    /// Fraction of questions answered correctly, rounded to two decimals
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAnswer {
    #[schema(value_type = String, format = Uuid)]
    pub question_id: Id,
    pub user_answer: String,
    pub is_correct: bool,
    pub feedback: String,
    pub score: f64,
    pub correct_answer: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    #[schema(value_type = String, format = DateTime)]
    pub submitted_at: DateTimeWithTimeZone,
    pub summary: SubmissionSummary,
    pub answers: Vec<SubmissionAnswer>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct QuizQuestions(pub Vec<QuizQuestion>);

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct QuizSubmissions(pub Vec<QuizSubmission>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = entity::practice_quizzes::Model)]
#[sea_orm(schema_name = "learning_assistant", table_name = "practice_quizzes")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    #[schema(value_type = String, format = Uuid)]
    pub user_id: Id,

    #[schema(value_type = String, format = Uuid)]
    pub conversation_id: Id,

    #[sea_orm(column_type = "JsonBinary")]
    #[schema(value_type = Vec<String>)]
    pub material_ids: IdList,

    pub question_type: QuestionType,

    pub difficulty: Difficulty,

    pub count: i32,

    pub status: QuizStatus,

    #[sea_orm(column_type = "Text")]
    pub material_summary: String,

    #[sea_orm(column_type = "JsonBinary")]
    #[schema(value_type = Vec<QuizQuestion>)]
    pub questions: QuizQuestions,

    #[sea_orm(column_type = "JsonBinary")]
    #[schema(value_type = Vec<QuizSubmission>)]
    pub submissions: QuizSubmissions,

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
        on_delete = "Cascade"
    )]
    Conversations,
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

impl ActiveModelBehavior for ActiveModel {}
