//! Generated study questions and grading of free answers against them.

use crate::difficulty::Difficulty;
use crate::error::Error;
use crate::gateway::health::ensure_service_healthy;
use crate::gateway::quiz::{EvaluateRequest, GenerateRequest, GeneratedQuestion, QuizClient};
use crate::json_list::StringList;
use crate::question_type::QuestionType;
use crate::questions::Model;
use crate::{conversation, learning_material, Id, QueryFilterMap, UpdateMap};
use entity_api::question;
use log::*;
use sea_orm::{DatabaseConnection, Value};
use serde_json::json;
use service::config::Config;
use service::health_cache::{HealthCache, UpstreamService};

pub use entity_api::question::delete_by_id;

pub const DEFAULT_LIMIT: u64 = 50;
pub const MAX_LIMIT: u64 = 100;
pub const MAX_COUNT: u32 = 10;

const NOT_FOUND: &str = "Question not found";

#[derive(Debug, Default)]
pub struct ListParams {
    pub conversation_id: Option<String>,
    pub material_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug)]
pub struct GenerateParams {
    pub material_id: Id,
    pub conversation_id: Option<Id>,
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub count: u32,
}

#[derive(Debug, Default)]
pub struct QuestionUpdate {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub difficulty: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct EvaluationOutcome {
    pub evaluation: serde_json::Value,
    pub attempts: i32,
    pub correct_attempts: i32,
}

/// Rejects counts outside `1..=MAX_COUNT`.
pub fn validate_count(count: u32) -> Result<u32, Error> {
    if (1..=MAX_COUNT).contains(&count) {
        Ok(count)
    } else {
        Err(Error::input(format!(
            "count must be between 1 and {MAX_COUNT}"
        )))
    }
}

/// The upstream's question type when it names a known one, otherwise the requested type.
pub(crate) fn resolve_question_type(upstream: Option<&str>, requested: QuestionType) -> QuestionType {
    upstream
        .and_then(|value| value.parse().ok())
        .unwrap_or(requested)
}

/// The upstream's difficulty, case-insensitively, otherwise the requested difficulty.
pub(crate) fn resolve_difficulty(upstream: Option<&str>, requested: Difficulty) -> Difficulty {
    upstream
        .and_then(|value| value.to_lowercase().parse().ok())
        .unwrap_or(requested)
}

fn new_model(
    user_id: Id,
    conversation_id: Option<Id>,
    material_id: Id,
    params: &GenerateParams,
    generated: GeneratedQuestion,
    material_summary: Option<&str>,
) -> Model {
    let now = chrono::Utc::now();
    Model {
        id: Default::default(),
        user_id,
        conversation_id,
        material_id,
        question_type: resolve_question_type(
            generated.question_type.as_deref(),
            params.question_type,
        ),
        difficulty: resolve_difficulty(generated.difficulty.as_deref(), params.difficulty),
        question: generated.question,
        options: StringList(generated.options.unwrap_or_default()),
        correct_answer: generated.correct_answer,
        explanation: generated.explanation.unwrap_or_default(),
        tags: StringList(generated.tags.unwrap_or_default()),
        source_summary: generated
            .source_summary
            .or_else(|| material_summary.map(str::to_string)),
        attempts: 0,
        correct_attempts: 0,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

/// Newest first.
pub async fn find_by_user(
    db: &DatabaseConnection,
    user_id: Id,
    params: ListParams,
) -> Result<Vec<Model>, Error> {
    let conversation_id =
        crate::parse_optional_id(params.conversation_id.as_deref(), "Invalid conversationId")?;
    let material_id =
        crate::parse_optional_id(params.material_id.as_deref(), "Invalid materialId")?;
    let limit = crate::clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);

    let mut query_filter_map = QueryFilterMap::new();
    query_filter_map.insert("user_id".to_string(), Some(Value::from(user_id)));
    if let Some(conversation_id) = conversation_id {
        query_filter_map.insert(
            "conversation_id".to_string(),
            Some(Value::from(conversation_id)),
        );
    }
    if let Some(material_id) = material_id {
        query_filter_map.insert("material_id".to_string(), Some(Value::from(material_id)));
    }

    Ok(question::find_by(db, query_filter_map, limit).await?)
}

/// A question owned by someone else is reported as missing.
pub async fn find_by_id_and_user(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
) -> Result<Model, Error> {
    question::find_by_id_and_user(db, id, user_id)
        .await
        .map_err(|e| Error::from(e).with_not_found_message(NOT_FOUND))
}

/// Has the quiz service write questions about one material and stores them all.
pub async fn generate(
    db: &DatabaseConnection,
    config: &Config,
    health: &HealthCache,
    user_id: Id,
    params: GenerateParams,
) -> Result<Vec<Model>, Error> {
    validate_count(params.count)?;

    let material = learning_material::find_by_id_and_user(db, params.material_id, user_id).await?;
    let conversation_id = match params.conversation_id {
        Some(conversation_id) => {
            conversation::find_by_id_and_user(db, conversation_id, user_id).await?;
            Some(conversation_id)
        }
        None => material.conversation_id,
    };

    ensure_service_healthy(config, health, UpstreamService::Quiz).await?;

    let payload = QuizClient::from_config(config)?
        .generate(&GenerateRequest {
            material_id: Some(material.id),
            material_ids: None,
            user_id,
            question_type: params.question_type,
            difficulty: params.difficulty,
            count: params.count,
        })
        .await?;

    let material_summary = payload.material_summary.as_deref();
    let mut questions = Vec::with_capacity(payload.questions.len());
    for generated in payload.questions {
        let model = new_model(
            user_id,
            conversation_id,
            material.id,
            &params,
            generated,
            material_summary,
        );
        questions.push(question::create(db, model).await?);
    }

    info!(
        "Generated {} questions from material {} for user {user_id}",
        questions.len(),
        material.id
    );
    Ok(questions)
}

fn required_text(value: Option<String>, field: &str) -> Result<Option<String>, Error> {
    match value {
        Some(value) if value.trim().is_empty() => {
            Err(Error::input(format!("{field} cannot be empty")))
        }
        value => Ok(value),
    }
}

fn update_map(params: QuestionUpdate) -> Result<UpdateMap, Error> {
    let mut update_map = UpdateMap::new();

    if let Some(question) = required_text(params.question, "question")? {
        update_map.insert("question".to_string(), Some(Value::from(question)));
    }
    if let Some(correct_answer) = required_text(params.correct_answer, "correctAnswer")? {
        update_map.insert("correct_answer".to_string(), Some(Value::from(correct_answer)));
    }
    if let Some(explanation) = params.explanation {
        update_map.insert("explanation".to_string(), Some(Value::from(explanation)));
    }
    if let Some(difficulty) = params.difficulty {
        let difficulty = difficulty
            .parse::<Difficulty>()
            .map_err(|_| Error::input("Invalid difficulty"))?;
        update_map.insert("difficulty".to_string(), Some(difficulty.into()));
    }
    if let Some(options) = params.options {
        update_map.insert("options".to_string(), Some(Value::from(json!(options))));
    }
    if let Some(tags) = params.tags {
        update_map.insert("tags".to_string(), Some(Value::from(json!(tags))));
    }

    if update_map.is_empty() {
        return Err(Error::input("No fields to update"));
    }
    Ok(update_map)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
    params: QuestionUpdate,
) -> Result<Model, Error> {
    let update_map = update_map(params)?;
    let existing = find_by_id_and_user(db, id, user_id).await?;

    Ok(question::update(db, existing, update_map).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Id, user_id: Id) -> Result<(), Error> {
    find_by_id_and_user(db, id, user_id).await?;
    Ok(delete_by_id(db, id).await?)
}

/// Grades `answer` with the quiz service and counts the attempt.
pub async fn evaluate(
    db: &DatabaseConnection,
    config: &Config,
    health: &HealthCache,
    id: Id,
    user_id: Id,
    answer: Option<String>,
) -> Result<EvaluationOutcome, Error> {
    let answer = answer
        .map(|answer| answer.trim().to_string())
        .filter(|answer| !answer.is_empty())
        .ok_or_else(|| Error::input("Answer is required"))?;

    let existing = find_by_id_and_user(db, id, user_id).await?;

    ensure_service_healthy(config, health, UpstreamService::Quiz).await?;

    let evaluation = QuizClient::from_config(config)?
        .evaluate(&EvaluateRequest {
            question: existing.question.clone(),
            question_type: existing.question_type,
            user_answer: answer,
            correct_answer: existing.correct_answer.clone(),
            explanation: Some(existing.explanation.clone()),
            material_summary: existing.source_summary.clone(),
        })
        .await?;

    let updated = question::record_attempt(db, existing, evaluation.is_correct()).await?;

    Ok(EvaluationOutcome {
        evaluation: evaluation.0,
        attempts: updated.attempts,
        correct_attempts: updated.correct_attempts,
    })
}


#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use clap::Parser;
    use mockito::{Matcher, Server};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn question_model(user_id: Id) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            user_id,
            conversation_id: None,
            material_id: Id::new_v4(),
            question: "Powerhouse of the cell?".to_string(),
            question_type: QuestionType::ShortAnswer,
            options: StringList::default(),
            correct_answer: "Mitochondria".to_string(),
            explanation: String::new(),
            difficulty: Difficulty::Easy,
            tags: StringList::default(),
            source_summary: None,
            attempts: 2,
            correct_attempts: 1,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn invalid_filter_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = find_by_user(
            &db,
            Id::new_v4(),
            ListParams {
                material_id: Some("not-a-uuid".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.message(), "Invalid materialId");
    }

    #[tokio::test]
    async fn evaluate_counts_correct_attempt() -> Result<(), Error> {
        let mut quiz_service = Server::new_async().await;
        let _health = quiz_service
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"healthy"}"#)
            .create_async()
            .await;
        let _evaluate = quiz_service
            .mock("POST", "/evaluate")
            .match_body(Matcher::PartialJson(json!({"user_answer": "mitochondria"})))
            .with_status(200)
            .with_body(r#"{"is_correct":true,"score":1.0,"feedback":"Correct"}"#)
            .create_async()
            .await;

        let user_id = Id::new_v4();
        let existing = question_model(user_id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing.clone()]])
            .append_query_results(vec![vec![Model {
                attempts: 3,
                correct_attempts: 2,
                ..existing.clone()
            }]])
            .into_connection();
        let config = Config::parse_from([
            "learning_assistant",
            "--quiz-service-url",
            quiz_service.url().as_str(),
        ]);

        let outcome = evaluate(
            &db,
            &config,
            &HealthCache::new(),
            existing.id,
            user_id,
            Some(" mitochondria ".to_string()),
        )
        .await?;

        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.correct_attempts, 2);
        assert_eq!(outcome.evaluation["feedback"], "Correct");
        Ok(())
    }

    #[tokio::test]
    async fn blank_answer_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let config = Config::parse_from(["learning_assistant"]);

        let err = evaluate(
            &db,
            &config,
            &HealthCache::new(),
            Id::new_v4(),
            Id::new_v4(),
            Some("  ".to_string()),
        )
        .await
        .unwrap_err();

        assert_eq!(err.message(), "Answer is required");
    }
}
