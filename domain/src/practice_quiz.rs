//! Practice quizzes drawn from every processed material of a conversation.

use crate::difficulty::Difficulty;
use crate::error::Error;
use crate::gateway::health::ensure_service_healthy;
use crate::gateway::quiz::{EvaluateRequest, GenerateRequest, GeneratedQuestion, QuizClient};
use crate::json_list::IdList;
use crate::practice_quizzes::{
    Model, QuizQuestion, QuizQuestions, QuizSubmission, QuizSubmissions, SubmissionAnswer,
    SubmissionSummary,
};
use crate::question::{resolve_difficulty, resolve_question_type, validate_count};
use crate::question_type::QuestionType;
use crate::quiz_status::QuizStatus;
use crate::{conversation, learning_material, rag, Id, QueryFilterMap};
use entity_api::practice_quiz;
use log::*;
use sea_orm::{DatabaseConnection, Value};
use service::config::Config;
use service::health_cache::{HealthCache, UpstreamService};
use std::collections::HashMap;

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 50;

const NOT_FOUND: &str = "Practice quiz not found";
const NO_ANSWER_FEEDBACK: &str = "No answer provided.";

#[derive(Debug)]
pub struct GenerateParams {
    pub conversation_id: Id,
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub count: u32,
}

#[derive(Debug, Default)]
pub struct ListParams {
    pub conversation_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AnswerEntry {
    pub question_id: Id,
    pub answer: Option<String>,
}

/// Two decimal fraction of correct answers; an empty quiz counts as one question.
pub fn summarize(answers: &[SubmissionAnswer]) -> SubmissionSummary {
    let correct = answers.iter().filter(|answer| answer.is_correct).count() as i32;
    let total = (answers.len() as i32).max(1);
    let score = (f64::from(correct) / f64::from(total) * 100.0).round() / 100.0;

    SubmissionSummary {
        correct,
        total,
        score,
    }
}

fn unanswered(question: &QuizQuestion) -> SubmissionAnswer {
    SubmissionAnswer {
        question_id: question.id,
        user_answer: String::new(),
        is_correct: false,
        feedback: NO_ANSWER_FEEDBACK.to_string(),
        score: 0.0,
        correct_answer: question.correct_answer.clone(),
    }
}

fn quiz_question(order: usize, generated: GeneratedQuestion, params: &GenerateParams) -> QuizQuestion {
    QuizQuestion {
        id: Id::new_v4(),
        order: order as i32,
        question_type: resolve_question_type(
            generated.question_type.as_deref(),
            params.question_type,
        ),
        difficulty: resolve_difficulty(generated.difficulty.as_deref(), params.difficulty),
        question: generated.question,
        options: generated.options.unwrap_or_default(),
        correct_answer: generated.correct_answer,
        explanation: generated.explanation.unwrap_or_default(),
        tags: generated.tags.unwrap_or_default(),
        source_summary: generated.source_summary,
    }
}

/// Processed material ids for the conversation. When there are none yet, pending and failed
/// materials are sent through the RAG service once more before giving up.
async fn ready_material_ids(
    db: &DatabaseConnection,
    config: &Config,
    health: &HealthCache,
    conversation_id: Id,
    user_id: Id,
) -> Result<Vec<Id>, Error> {
    let ready = learning_material::find_processed_ids(db, conversation_id, user_id).await?;
    if !ready.is_empty() {
        return Ok(ready);
    }

    let materials = learning_material::find_by_conversation(db, conversation_id, user_id).await?;
    if materials.is_empty() {
        return Err(Error::input(
            "No learning materials found for this conversation",
        ));
    }

    let reprocessable: Vec<_> = materials
        .iter()
        .filter(|material| material.processing_status.is_reprocessable())
        .collect();
    if !reprocessable.is_empty() {
        ensure_service_healthy(config, health, UpstreamService::Rag).await?;
        for material in reprocessable {
            if let Err(e) = rag::process_material(db, config, material).await {
                warn!(
                    "Reprocessing material {} for a practice quiz failed: {}",
                    material.id,
                    e.message()
                );
            }
        }
    }

    let ready = learning_material::find_processed_ids(db, conversation_id, user_id).await?;
    if ready.is_empty() {
        return Err(Error::conflict(
            "Materials are still being processed. Please try again in a moment.",
        ));
    }
    Ok(ready)
}

pub async fn generate(
    db: &DatabaseConnection,
    config: &Config,
    health: &HealthCache,
    user_id: Id,
    params: GenerateParams,
) -> Result<Model, Error> {
    validate_count(params.count)?;
    conversation::find_by_id_and_user(db, params.conversation_id, user_id).await?;

    let material_ids =
        ready_material_ids(db, config, health, params.conversation_id, user_id).await?;

    ensure_service_healthy(config, health, UpstreamService::Quiz).await?;

    let payload = QuizClient::from_config(config)?
        .generate(&GenerateRequest {
            material_id: None,
            material_ids: Some(material_ids.clone()),
            user_id,
            question_type: params.question_type,
            difficulty: params.difficulty,
            count: params.count,
        })
        .await?;

    let questions = payload
        .questions
        .into_iter()
        .enumerate()
        .map(|(order, generated)| quiz_question(order, generated, &params))
        .collect();

    let now = chrono::Utc::now();
    let quiz = practice_quiz::create(
        db,
        Model {
            id: Default::default(),
            user_id,
            conversation_id: params.conversation_id,
            material_ids: IdList(material_ids),
            question_type: params.question_type,
            difficulty: params.difficulty,
            count: params.count as i32,
            status: QuizStatus::Generated,
            material_summary: payload.material_summary.unwrap_or_default(),
            questions: QuizQuestions(questions),
            submissions: QuizSubmissions::default(),
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await?;

    info!(
        "Generated practice quiz {} with {} questions",
        quiz.id,
        quiz.questions.0.len()
    );
    Ok(quiz)
}

/// Newest first.
pub async fn find_by_user(
    db: &DatabaseConnection,
    user_id: Id,
    params: ListParams,
) -> Result<Vec<Model>, Error> {
    let conversation_id =
        crate::parse_optional_id(params.conversation_id.as_deref(), "Invalid conversationId")?;
    let limit = crate::clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);

    let mut query_filter_map = QueryFilterMap::new();
    query_filter_map.insert("user_id".to_string(), Some(Value::from(user_id)));
    if let Some(conversation_id) = conversation_id {
        query_filter_map.insert(
            "conversation_id".to_string(),
            Some(Value::from(conversation_id)),
        );
    }

    Ok(practice_quiz::find_by(db, query_filter_map, limit).await?)
}

pub async fn find_by_id_and_user(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
) -> Result<Model, Error> {
    practice_quiz::find_by_id_and_user(db, id, user_id)
        .await
        .map_err(|e| Error::from(e).with_not_found_message(NOT_FOUND))
}

/// Grades every question of the quiz in order and appends the submission.
pub async fn submit(
    db: &DatabaseConnection,
    config: &Config,
    health: &HealthCache,
    id: Id,
    user_id: Id,
    entries: Vec<AnswerEntry>,
) -> Result<(Model, QuizSubmission), Error> {
    if entries.is_empty() {
        return Err(Error::input("answers are required"));
    }

    let quiz = find_by_id_and_user(db, id, user_id).await?;

    let answers_by_question: HashMap<Id, String> = entries
        .into_iter()
        .map(|entry| {
            let answer = entry.answer.unwrap_or_default().trim().to_string();
            (entry.question_id, answer)
        })
        .collect();

    let mut client: Option<QuizClient> = None;
    let mut answers = Vec::with_capacity(quiz.questions.0.len());

    for question in &quiz.questions.0 {
        let user_answer = answers_by_question
            .get(&question.id)
            .cloned()
            .unwrap_or_default();

        if user_answer.is_empty() {
            answers.push(unanswered(question));
            continue;
        }

        let quiz_client = match client.take() {
            Some(quiz_client) => quiz_client,
            None => {
                ensure_service_healthy(config, health, UpstreamService::Quiz).await?;
                QuizClient::from_config(config)?
            }
        };

        let evaluation = quiz_client
            .evaluate(&EvaluateRequest {
                question: question.question.clone(),
                question_type: question.question_type,
                user_answer: user_answer.clone(),
                correct_answer: question.correct_answer.clone(),
                explanation: Some(question.explanation.clone()),
                material_summary: Some(quiz.material_summary.clone()),
            })
            .await?;
        client = Some(quiz_client);

        answers.push(SubmissionAnswer {
            question_id: question.id,
            user_answer,
            is_correct: evaluation.is_correct(),
            feedback: evaluation.feedback(),
            score: evaluation.score(),
            correct_answer: question.correct_answer.clone(),
        });
    }

    let submission = QuizSubmission {
        submitted_at: chrono::Utc::now().into(),
        summary: summarize(&answers),
        answers,
    };

    let quiz = practice_quiz::record_submission(db, quiz, submission.clone()).await?;
    Ok((quiz, submission))
}
