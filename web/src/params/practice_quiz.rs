use domain::difficulty::Difficulty;
use domain::practice_quiz::{AnswerEntry, ListParams};
use domain::question_type::QuestionType;
use domain::Id;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateParams {
    #[schema(value_type = String, format = Uuid)]
    pub(crate) conversation_id: Id,
    #[serde(default)]
    pub(crate) question_type: QuestionType,
    #[serde(default = "default_difficulty")]
    pub(crate) difficulty: Difficulty,
    #[serde(default = "default_count")]
    pub(crate) count: u32,
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

fn default_count() -> u32 {
    5
}

impl From<GenerateParams> for domain::practice_quiz::GenerateParams {
    fn from(params: GenerateParams) -> Self {
        domain::practice_quiz::GenerateParams {
            conversation_id: params.conversation_id,
            question_type: params.question_type,
            difficulty: params.difficulty,
            count: params.count,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    pub(crate) conversation_id: Option<String>,
    /// Defaults to 20, at most 50
    pub(crate) limit: Option<i64>,
}

impl From<IndexParams> for ListParams {
    fn from(params: IndexParams) -> Self {
        ListParams {
            conversation_id: params.conversation_id,
            limit: params.limit,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerParams {
    #[schema(value_type = String, format = Uuid)]
    pub(crate) question_id: Id,
    pub(crate) answer: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct SubmitParams {
    #[serde(default)]
    pub(crate) answers: Vec<AnswerParams>,
}

impl From<SubmitParams> for Vec<AnswerEntry> {
    fn from(params: SubmitParams) -> Self {
        params
            .answers
            .into_iter()
            .map(|answer| AnswerEntry {
                question_id: answer.question_id,
                answer: answer.answer,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generate_params_fill_in_defaults() {
        let conversation_id = Id::new_v4();
        let params: GenerateParams =
            serde_json::from_value(json!({ "conversationId": conversation_id })).unwrap();

        assert_eq!(params.question_type, QuestionType::MultipleChoice);
        assert_eq!(params.difficulty, Difficulty::Medium);
        assert_eq!(params.count, 5);
    }

    #[test]
    fn submit_params_keep_missing_answers() {
        let question_id = Id::new_v4();
        let params: SubmitParams =
            serde_json::from_value(json!({ "answers": [{ "questionId": question_id }] })).unwrap();

        let entries: Vec<AnswerEntry> = params.into();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question_id, question_id);
        assert_eq!(entries[0].answer, None);
    }
}
