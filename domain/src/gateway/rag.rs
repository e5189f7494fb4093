//! Client for the retrieval-augmented generation service.

use crate::error::Error;
use entity::Id;
use log::*;
use serde::Serialize;
use serde_json::Value;
use service::config::Config;
use service::health_cache::UpstreamService;

pub const DEFAULT_TOP_K: u32 = 5;

#[derive(Debug, Serialize)]
pub struct RagQueryRequest {
    pub question: String,
    pub user_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_ids: Option<Vec<Id>>,
    pub top_k: u32,
}

pub struct RagClient {
    client: reqwest::Client,
    base_url: String,
}

impl RagClient {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            client: super::build_client(None)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(config.upstream_url(UpstreamService::Rag))
    }

    /// Sends a PDF to be chunked and indexed. Returns the service's JSON answer as is.
    pub async fn process(
        &self,
        file: Vec<u8>,
        filename: &str,
        material_id: Id,
        user_id: Id,
    ) -> Result<Value, Error> {
        debug!("Sending material {material_id} ({filename}) to the RAG service");

        let part = reqwest::multipart::Part::bytes(file)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("material_id", material_id.to_string())
            .text("user_id", user_id.to_string());

        let response = self
            .client
            .post(format!("{}/process", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = super::error_body(response, "RAG service error").await;
            return Err(Error::other(format!("RAG processing failed: {text}")));
        }

        response.json::<Value>().await.map_err(|e| Error {
            source: Some(Box::new(e)),
            ..Error::other("RAG processing returned an unreadable response")
        })
    }

    pub async fn query(&self, request: &RagQueryRequest) -> Result<Value, Error> {
        debug!("Querying the RAG service for user {}", request.user_id);

        let response = self
            .client
            .post(format!("{}/query", self.base_url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = super::error_body(response, "RAG service error").await;
            return Err(Error::bad_gateway(text));
        }

        response.json::<Value>().await.map_err(|e| Error {
            source: Some(Box::new(e)),
            ..Error::bad_gateway("Invalid response from RAG service")
        })
    }
}

/// The `documents` count of a process response, when present and in range.
pub fn document_count(process_response: &Value) -> Option<i32> {
    process_response
        .get("documents")
        .and_then(Value::as_i64)
        .and_then(|count| i32::try_from(count).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, ExternalErrorKind};
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn process_sends_multipart_form() {
        let mut server = Server::new_async().await;
        let material_id = Id::new_v4();
        let mock = server
            .mock("POST", "/process")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="cells.pdf""#.to_string()),
                Matcher::Regex(format!(r#"name="material_id"\r\n\r\n{material_id}"#)),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"processed","documents":12,"chunk_size":512}"#)
            .create_async()
            .await;

        let client = RagClient::new(&server.url()).unwrap();
        let response = client
            .process(b"%PDF-1.4".to_vec(), "cells.pdf", material_id, Id::new_v4())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(document_count(&response), Some(12));
    }

    #[tokio::test]
    async fn process_failure_is_an_internal_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/process")
            .with_status(500)
            .with_body("index unavailable")
            .create_async()
            .await;

        let client = RagClient::new(&server.url()).unwrap();
        let err = client
            .process(b"%PDF".to_vec(), "a.pdf", Id::new_v4(), Id::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err.error_kind, DomainErrorKind::Internal(_)));
        assert!(format!("{err}").contains("index unavailable"));
    }

    #[tokio::test]
    async fn query_forwards_top_k_and_material_ids() {
        let mut server = Server::new_async().await;
        let user_id = Id::new_v4();
        let material_id = Id::new_v4();
        let _mock = server
            .mock("POST", "/query")
            .match_body(Matcher::Json(json!({
                "question": "What is ATP?",
                "user_id": user_id,
                "material_ids": [material_id],
                "top_k": 5
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"answer":"Energy currency","sources":[],"confidence":0.9}"#)
            .create_async()
            .await;

        let client = RagClient::new(&server.url()).unwrap();
        let answer = client
            .query(&RagQueryRequest {
                question: "What is ATP?".to_string(),
                user_id,
                material_ids: Some(vec![material_id]),
                top_k: DEFAULT_TOP_K,
            })
            .await
            .unwrap();

        assert_eq!(answer["answer"], "Energy currency");
    }

    #[tokio::test]
    async fn query_error_is_a_bad_gateway() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/query")
            .with_status(422)
            .with_body("question too long")
            .create_async()
            .await;

        let client = RagClient::new(&server.url()).unwrap();
        let err = client
            .query(&RagQueryRequest {
                question: "?".to_string(),
                user_id: Id::new_v4(),
                material_ids: None,
                top_k: DEFAULT_TOP_K,
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::BadGateway(
                "question too long".to_string()
            ))
        );
    }

    #[test]
    fn document_count_ignores_missing_or_invalid_values() {
        assert_eq!(document_count(&json!({})), None);
        assert_eq!(document_count(&json!({"documents": "many"})), None);
        assert_eq!(document_count(&json!({"documents": 3})), Some(3));
    }
}
