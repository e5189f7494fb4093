use crate::controller::ApiResponse;
use crate::extractors::{authenticated_user::AuthenticatedUser, valid_json::ValidJson};
use crate::params::question::{EvaluateParams, GenerateParams, IndexParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::question as QuestionApi;
use domain::Id;
use serde_json::json;

use log::*;

/// GET the caller's Questions, newest first
#[utoipa::path(
    get,
    path = "/api/questions",
    params(IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved Questions", body = [domain::questions::Model]),
        (status = 400, description = "Invalid conversationId or materialId"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Questions with params: {params:?}");

    let questions =
        QuestionApi::find_by_user(app_state.db_conn_ref(), user.id, params.into()).await?;

    Ok(Json(ApiResponse::new(questions)))
}

/// POST generate Questions about a Learning Material
#[utoipa::path(
    post,
    path = "/api/questions",
    request_body = GenerateParams,
    responses(
        (status = 201, description = "Successfully generated Questions", body = [domain::questions::Model]),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Material not found"),
        (status = 502, description = "Quiz service returned an error or no questions"),
        (status = 503, description = "Quiz service is unavailable"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    ValidJson(params): ValidJson<GenerateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Generate Questions from: {params:?}");

    let questions = QuestionApi::generate(
        app_state.db_conn_ref(),
        &app_state.config,
        app_state.health_cache_ref(),
        user.id,
        params.into(),
    )
    .await?;

    info!("Generated {} questions for user {}", questions.len(), user.id);

    Ok((StatusCode::CREATED, Json(ApiResponse::new(questions))))
}

/// GET a particular Question specified by its id.
#[utoipa::path(
    get,
    path = "/api/questions/{id}",
    params(
        ("id" = Uuid, Path, description = "Question id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Question", body = domain::questions::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Question not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Question by id: {id}");

    let question = QuestionApi::find_by_id_and_user(app_state.db_conn_ref(), id, user.id).await?;

    Ok(Json(ApiResponse::new(question)))
}

#[utoipa::path(
    put,
    path = "/api/questions/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the Question to update"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Question", body = domain::questions::Model),
        (status = 400, description = "No fields to update, or an empty value"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Question not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    ValidJson(params): ValidJson<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Question {id} with: {params:?}");

    let question =
        QuestionApi::update(app_state.db_conn_ref(), id, user.id, params.into()).await?;

    Ok(Json(ApiResponse::new(question)))
}

#[utoipa::path(
    delete,
    path = "/api/questions/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the Question to delete"),
    ),
    responses(
        (status = 200, description = "Successfully Deleted Question"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Question not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Question {id}");

    QuestionApi::delete(app_state.db_conn_ref(), id, user.id).await?;

    Ok(Json(ApiResponse::<()>::message("Question deleted successfully")))
}

/// POST grade an answer to a Question
#[utoipa::path(
    post,
    path = "/api/questions/{id}/evaluate",
    params(
        ("id" = Uuid, Path, description = "Id of the Question being answered"),
    ),
    request_body = EvaluateParams,
    responses(
        (status = 200, description = "The quiz service's evaluation with updated attempt counts"),
        (status = 400, description = "Answer is required"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Question not found"),
        (status = 502, description = "Quiz service returned an error"),
        (status = 503, description = "Quiz service is unavailable"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn evaluate(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    ValidJson(params): ValidJson<EvaluateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Evaluate answer to Question {id}");

    let outcome = QuestionApi::evaluate(
        app_state.db_conn_ref(),
        &app_state.config,
        app_state.health_cache_ref(),
        id,
        user.id,
        params.answer,
    )
    .await?;

    Ok(Json(ApiResponse::new(json!({
        "evaluation": outcome.evaluation,
        "attempts": outcome.attempts,
        "correctAttempts": outcome.correct_attempts,
    }))))
}
