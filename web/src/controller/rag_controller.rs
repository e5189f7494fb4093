use crate::controller::ApiResponse;
use crate::extractors::{authenticated_user::AuthenticatedUser, valid_json::ValidJson};
use crate::params::rag::{ProcessParams, QueryParams};
use crate::{AppState, Error};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use domain::error::Error as DomainError;
use domain::rag as RagApi;
use serde_json::json;

use log::*;

/// POST index a Learning Material with the RAG service
#[utoipa::path(
    post,
    path = "/api/rag/process",
    request_body = ProcessParams,
    responses(
        (status = 200, description = "The material was indexed; `data.rag` is the RAG service's answer"),
        (status = 400, description = "materialId is required"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Material not found"),
        (status = 500, description = "RAG processing failed"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn process(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    ValidJson(params): ValidJson<ProcessParams>,
) -> Result<impl IntoResponse, Error> {
    let material_id = params
        .material_id
        .ok_or_else(|| DomainError::input("materialId is required"))?;

    info!("Processing material {material_id} for user {}", user.id);

    let outcome =
        RagApi::process(app_state.db_conn_ref(), &app_state.config, material_id, user.id).await?;

    Ok(Json(ApiResponse::new(json!({
        "materialId": outcome.material_id,
        "rag": outcome.rag,
    }))))
}

/// POST ask a question against the caller's indexed materials
#[utoipa::path(
    post,
    path = "/api/rag/query",
    request_body = QueryParams,
    responses(
        (status = 200, description = "The RAG service's answer"),
        (status = 400, description = "Question is required"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "One or more materials are not accessible"),
        (status = 502, description = "RAG service returned an error"),
        (status = 503, description = "RAG service is unavailable"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn query(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    ValidJson(params): ValidJson<QueryParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST RAG query from user {}: {params:?}", user.id);

    let answer = RagApi::query(
        app_state.db_conn_ref(),
        &app_state.config,
        app_state.health_cache_ref(),
        user.id,
        params.into(),
    )
    .await?;

    Ok(Json(ApiResponse::new(answer)))
}
