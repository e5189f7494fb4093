use domain::difficulty::Difficulty;
use domain::question::{ListParams, QuestionUpdate};
use domain::question_type::QuestionType;
use domain::Id;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    pub(crate) conversation_id: Option<String>,
    pub(crate) material_id: Option<String>,
    /// Defaults to 50, at most 100
    pub(crate) limit: Option<i64>,
}

impl From<IndexParams> for ListParams {
    fn from(params: IndexParams) -> Self {
        ListParams {
            conversation_id: params.conversation_id,
            material_id: params.material_id,
            limit: params.limit,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateParams {
    #[schema(value_type = String, format = Uuid)]
    pub(crate) material_id: Id,
    #[schema(value_type = Option<String>, format = Uuid)]
    pub(crate) conversation_id: Option<Id>,
    pub(crate) question_type: QuestionType,
    pub(crate) difficulty: Difficulty,
    /// Between 1 and 10
    pub(crate) count: u32,
}

impl From<GenerateParams> for domain::question::GenerateParams {
    fn from(params: GenerateParams) -> Self {
        domain::question::GenerateParams {
            material_id: params.material_id,
            conversation_id: params.conversation_id,
            question_type: params.question_type,
            difficulty: params.difficulty,
            count: params.count,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateParams {
    pub(crate) question: Option<String>,
    pub(crate) options: Option<Vec<String>>,
    pub(crate) correct_answer: Option<String>,
    pub(crate) explanation: Option<String>,
    pub(crate) difficulty: Option<String>,
    pub(crate) tags: Option<Vec<String>>,
}

impl From<UpdateParams> for QuestionUpdate {
    fn from(params: UpdateParams) -> Self {
        QuestionUpdate {
            question: params.question,
            options: params.options,
            correct_answer: params.correct_answer,
            explanation: params.explanation,
            difficulty: params.difficulty,
            tags: params.tags,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct EvaluateParams {
    pub(crate) answer: Option<String>,
}
