//! Practice quiz DTOs
//!
//! Quiz questions are sent without their correct answers; the answers only come back
//! inside graded submissions.

use domain::difficulty::Difficulty;
use domain::practice_quizzes::{
    Model as PracticeQuizModel, QuizQuestion, QuizSubmission, SubmissionAnswer, SubmissionSummary,
};
use domain::question_type::QuestionType;
use domain::quiz_status::QuizStatus;
use domain::Id;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionView {
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,
    pub order: i32,
    pub question: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub explanation: String,
    pub source_summary: String,
}

impl From<QuizQuestion> for QuizQuestionView {
    fn from(question: QuizQuestion) -> Self {
        Self {
            id: question.id,
            order: question.order,
            question: question.question,
            question_type: question.question_type,
            options: question.options,
            difficulty: question.difficulty,
            tags: question.tags,
            explanation: question.explanation,
            source_summary: question.source_summary.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PracticeQuizView {
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,
    #[schema(value_type = String, format = Uuid)]
    pub user_id: Id,
    #[schema(value_type = String, format = Uuid)]
    pub conversation_id: Id,
    #[schema(value_type = Vec<String>)]
    pub material_ids: Vec<Id>,
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub count: i32,
    pub status: QuizStatus,
    pub material_summary: String,
    pub questions: Vec<QuizQuestionView>,
    pub submissions: Vec<QuizSubmission>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

impl From<PracticeQuizModel> for PracticeQuizView {
    fn from(quiz: PracticeQuizModel) -> Self {
        let mut questions: Vec<QuizQuestionView> =
            quiz.questions.0.into_iter().map(Into::into).collect();
        questions.sort_by_key(|question| question.order);

        Self {
            id: quiz.id,
            user_id: quiz.user_id,
            conversation_id: quiz.conversation_id,
            material_ids: quiz.material_ids.0,
            question_type: quiz.question_type,
            difficulty: quiz.difficulty,
            count: quiz.count,
            status: quiz.status,
            material_summary: quiz.material_summary,
            questions,
            submissions: quiz.submissions.0,
            created_at: quiz.created_at,
            updated_at: quiz.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionResult {
    pub summary: SubmissionSummary,
    pub answers: Vec<SubmissionAnswer>,
}

/// Response data of a quiz submission
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmitResponse {
    pub quiz: PracticeQuizView,
    pub submission: SubmissionResult,
}

impl SubmitResponse {
    pub fn new(quiz: PracticeQuizModel, submission: QuizSubmission) -> Self {
        Self {
            quiz: quiz.into(),
            submission: SubmissionResult {
                summary: submission.summary,
                answers: submission.answers,
            },
        }
    }
}
