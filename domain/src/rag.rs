//! Indexing materials with the RAG service and asking it questions.

use crate::error::Error;
use crate::gateway::health::ensure_service_healthy;
use crate::gateway::r2::R2Client;
use crate::gateway::rag::{self, RagClient, RagQueryRequest};
use crate::learning_materials::Model;
use crate::Id;
use entity_api::learning_material;
use log::*;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use service::config::Config;
use service::health_cache::{HealthCache, UpstreamService};

#[derive(Debug)]
pub struct ProcessOutcome {
    pub material_id: Id,
    pub rag: Value,
}

#[derive(Debug, Default)]
pub struct QueryRequest {
    pub question: Option<String>,
    pub material_ids: Option<Vec<Id>>,
    pub top_k: Option<u32>,
}

/// Unlike the other material routes, a foreign material is reported as forbidden here.
async fn find_accessible(db: &DatabaseConnection, id: Id, user_id: Id) -> Result<Model, Error> {
    let material = learning_material::find_by_id(db, id)
        .await
        .map_err(|e| Error::from(e).with_not_found_message("Material not found"))?;

    if material.user_id != user_id {
        warn!("User {user_id} attempted to process material {id} they don't own");
        return Err(Error::forbidden("Access denied"));
    }
    Ok(material)
}

/// Downloads the material's file and sends it to the RAG service, tracking the material's
/// processing status on the way. A failure is recorded on the material and returned.
pub async fn process_material(
    db: &DatabaseConnection,
    config: &Config,
    material: &Model,
) -> Result<Value, Error> {
    match index_material(db, config, material).await {
        Ok(response) => {
            learning_material::mark_processed(db, material.id, rag::document_count(&response))
                .await?;
            info!("Material {} processed by the RAG service", material.id);
            Ok(response)
        }
        Err(e) => {
            let message = e.message();
            learning_material::mark_failed(db, material.id, message.clone()).await?;
            Err(Error {
                source: Some(Box::new(e)),
                ..Error::other(message)
            })
        }
    }
}

async fn index_material(
    db: &DatabaseConnection,
    config: &Config,
    material: &Model,
) -> Result<Value, Error> {
    let file = R2Client::from_config(config)?
        .get_object(&material.file_path)
        .await?;

    learning_material::mark_processing(db, material.id).await?;

    RagClient::from_config(config)?
        .process(
            file,
            &material.original_filename,
            material.id,
            material.user_id,
        )
        .await
}

pub async fn process(
    db: &DatabaseConnection,
    config: &Config,
    material_id: Id,
    user_id: Id,
) -> Result<ProcessOutcome, Error> {
    let material = find_accessible(db, material_id, user_id).await?;
    let rag = process_material(db, config, &material).await?;

    Ok(ProcessOutcome { material_id, rag })
}

/// Answers a question from the caller's indexed materials.
pub async fn query(
    db: &DatabaseConnection,
    config: &Config,
    health: &HealthCache,
    user_id: Id,
    request: QueryRequest,
) -> Result<Value, Error> {
    let question = request
        .question
        .map(|question| question.trim().to_string())
        .filter(|question| !question.is_empty())
        .ok_or_else(|| Error::input("Question is required"))?;

    if let Some(material_ids) = &request.material_ids {
        for material_id in material_ids {
            match learning_material::find_by_id_and_user(db, *material_id, user_id).await {
                Ok(_) => {}
                Err(e) => {
                    let err = Error::from(e);
                    if err.is_not_found() {
                        return Err(Error::forbidden("One or more materials are not accessible"));
                    }
                    return Err(err);
                }
            }
        }
    }

    ensure_service_healthy(config, health, UpstreamService::Rag).await?;

    RagClient::from_config(config)?
        .query(&RagQueryRequest {
            question,
            user_id,
            material_ids: request.material_ids,
            top_k: request.top_k.unwrap_or(rag::DEFAULT_TOP_K),
        })
        .await
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, EntityErrorKind, InternalErrorKind};
    use crate::material_type::MaterialType;
    use crate::processing_status::ProcessingStatus;
    use clap::Parser;
    use mockito::Server;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    fn material(user_id: Id) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            user_id,
            conversation_id: None,
            course_name: "Biology".to_string(),
            material_type: MaterialType::Lecture,
            description: String::new(),
            file_path: format!("{user_id}/1_cells.pdf"),
            file_size: 8,
            original_filename: "cells.pdf".to_string(),
            processing_status: ProcessingStatus::Pending,
            processing_error: None,
            processed_at: None,
            vector_document_count: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn processing_a_foreign_material_is_forbidden() {
        let owner = Id::new_v4();
        let material = material(owner);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![material.clone()]])
            .into_connection();
        let config = Config::parse_from(["learning_assistant"]);

        let err = process(&db, &config, material.id, Id::new_v4())
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Forbidden("Access denied".to_string()))
        );
    }

    #[tokio::test]
    async fn query_requires_a_question() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let config = Config::parse_from(["learning_assistant"]);

        let err = query(
            &db,
            &config,
            &HealthCache::new(),
            Id::new_v4(),
            QueryRequest {
                question: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.message(), "Question is required");
    }

    #[tokio::test]
    async fn query_with_foreign_material_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();
        let config = Config::parse_from(["learning_assistant"]);

        let err = query(
            &db,
            &config,
            &HealthCache::new(),
            Id::new_v4(),
            QueryRequest {
                question: Some("What is ATP?".to_string()),
                material_ids: Some(vec![Id::new_v4()]),
                top_k: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.message(), "One or more materials are not accessible");
    }

    #[tokio::test]
    async fn query_reports_database_failures_as_internal_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let config = Config::parse_from(["learning_assistant"]);

        let err = query(
            &db,
            &config,
            &HealthCache::new(),
            Id::new_v4(),
            QueryRequest {
                question: Some("What is ATP?".to_string()),
                material_ids: Some(vec![Id::new_v4()]),
                top_k: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::DbTransaction))
        );
    }

    #[tokio::test]
    async fn failed_processing_is_recorded_on_the_material() {
        let mut storage = Server::new_async().await;
        let mut rag_service = Server::new_async().await;
        let user_id = Id::new_v4();
        let material = material(user_id);

        let _download = storage
            .mock("GET", format!("/materials/{}", material.file_path).as_str())
            .with_status(200)
            .with_body("%PDF-1.4")
            .create_async()
            .await;
        let _process = rag_service
            .mock("POST", "/process")
            .with_status(500)
            .with_body("parser crashed")
            .create_async()
            .await;

        let failed = Model {
            processing_status: ProcessingStatus::Failed,
            processing_error: Some("RAG processing failed: parser crashed".to_string()),
            ..material.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![Model {
                processing_status: ProcessingStatus::Processing,
                ..material.clone()
            }]])
            .append_query_results(vec![vec![failed]])
            .into_connection();

        let config = Config::parse_from([
            "learning_assistant",
            "--r2-endpoint",
            storage.url().as_str(),
            "--r2-bucket-name",
            "materials",
            "--r2-access-key-id",
            "key",
            "--r2-secret-access-key",
            "secret",
            "--rag-service-url",
            rag_service.url().as_str(),
        ]);

        let err = process_material(&db, &config, &material).await.unwrap_err();

        assert_eq!(err.message(), "RAG processing failed: parser crashed");
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("RAG processing failed: parser crashed"));
    }
}
