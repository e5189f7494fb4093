//! Client for the quiz service: question generation and free-form answer grading.

use crate::error::Error;
use entity::difficulty::Difficulty;
use entity::question_type::QuestionType;
use entity::Id;
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::config::Config;
use service::health_cache::UpstreamService;

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_ids: Option<Vec<Id>>,
    pub user_id: Id,
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub count: u32,
}

/// A question as the quiz service describes it. Every field but the prompt and answer is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneratedQuestion {
    pub question: String,
    pub question_type: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub difficulty: Option<String>,
    pub tags: Option<Vec<String>>,
    pub source_summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub questions: Vec<GeneratedQuestion>,
    #[serde(default)]
    pub material_summary: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateRequest {
    pub question: String,
    pub question_type: QuestionType,
    pub user_answer: String,
    pub correct_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_summary: Option<String>,
}

/// The grader's verdict. The raw JSON is kept so it can be returned to the client untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation(pub Value);

impl Evaluation {
    pub fn is_correct(&self) -> bool {
        self.0
            .get("is_correct")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn score(&self) -> f64 {
        self.0.get("score").and_then(Value::as_f64).unwrap_or(0.0)
    }

    pub fn feedback(&self) -> String {
        self.0
            .get("feedback")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

pub struct QuizClient {
    client: reqwest::Client,
    base_url: String,
}

impl QuizClient {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            client: super::build_client(None)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(config.upstream_url(UpstreamService::Quiz))
    }

    /// Asks the quiz service for questions. An empty question list is an error.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, Error> {
        debug!(
            "Requesting {} {} {} questions for user {}",
            request.count, request.difficulty, request.question_type, request.user_id
        );

        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = super::error_body(response, "Quiz service error").await;
            return Err(Error::bad_gateway(text));
        }

        let payload = response.json::<GenerateResponse>().await.map_err(|e| Error {
            source: Some(Box::new(e)),
            ..Error::bad_gateway("Invalid response from quiz service")
        })?;

        if payload.questions.is_empty() {
            return Err(Error::bad_gateway("Quiz service returned no questions"));
        }

        Ok(payload)
    }

    pub async fn evaluate(&self, request: &EvaluateRequest) -> Result<Evaluation, Error> {
        let response = self
            .client
            .post(format!("{}/evaluate", self.base_url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = super::error_body(response, "Quiz service error").await;
            return Err(Error::bad_gateway(text));
        }

        let value = response.json::<Value>().await.map_err(|e| Error {
            source: Some(Box::new(e)),
            ..Error::bad_gateway("Invalid response from quiz service")
        })?;

        Ok(Evaluation(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, ExternalErrorKind};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn generate_request(user_id: Id) -> GenerateRequest {
        GenerateRequest {
            material_id: Some(Id::new_v4()),
            material_ids: None,
            user_id,
            question_type: QuestionType::MultipleChoice,
            difficulty: Difficulty::Easy,
            count: 2,
        }
    }

    #[tokio::test]
    async fn generate_parses_questions_and_summary() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/generate")
            .match_body(Matcher::PartialJson(json!({
                "question_type": "multiple_choice",
                "difficulty": "easy",
                "count": 2
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "questions": [
                        {"question": "2+2?", "options": ["3", "4"], "correct_answer": "4"},
                        {"question": "Capital of France?", "correct_answer": "Paris", "tags": ["geo"]}
                    ],
                    "material_summary": "Basics"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = QuizClient::new(&server.url()).unwrap();
        let payload = client.generate(&generate_request(Id::new_v4())).await.unwrap();

        assert_eq!(payload.questions.len(), 2);
        assert_eq!(payload.questions[0].options, Some(vec!["3".into(), "4".into()]));
        assert_eq!(payload.questions[1].tags, Some(vec!["geo".into()]));
        assert_eq!(payload.material_summary.as_deref(), Some("Basics"));
    }

    #[tokio::test]
    async fn generate_without_questions_is_a_bad_gateway() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"questions":[]}"#)
            .create_async()
            .await;

        let client = QuizClient::new(&server.url()).unwrap();
        let err = client
            .generate(&generate_request(Id::new_v4()))
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::BadGateway(
                "Quiz service returned no questions".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn evaluate_reads_verdict() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/evaluate")
            .match_body(Matcher::PartialJson(json!({
                "user_answer": "mitochondria",
                "question_type": "short_answer"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"is_correct":true,"score":0.9,"feedback":"Nice"}"#)
            .create_async()
            .await;

        let client = QuizClient::new(&server.url()).unwrap();
        let evaluation = client
            .evaluate(&EvaluateRequest {
                question: "Powerhouse of the cell?".to_string(),
                question_type: QuestionType::ShortAnswer,
                user_answer: "mitochondria".to_string(),
                correct_answer: "Mitochondria".to_string(),
                explanation: None,
                material_summary: None,
            })
            .await
            .unwrap();

        assert!(evaluation.is_correct());
        assert_eq!(evaluation.score(), 0.9);
        assert_eq!(evaluation.feedback(), "Nice");
    }

    #[test]
    fn evaluation_defaults_when_fields_are_missing() {
        let evaluation = Evaluation(json!({"is_correct": "yes"}));

        assert!(!evaluation.is_correct());
        assert_eq!(evaluation.score(), 0.0);
        assert_eq!(evaluation.feedback(), "");
    }
}
