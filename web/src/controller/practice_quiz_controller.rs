use crate::controller::ApiResponse;
use crate::extractors::{authenticated_user::AuthenticatedUser, valid_json::ValidJson};
use crate::params::practice_quiz::{GenerateParams, IndexParams, SubmitParams};
use crate::response::practice_quiz::{PracticeQuizView, SubmitResponse};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::practice_quiz as PracticeQuizApi;
use domain::Id;

use log::*;

/// POST generate a Practice Quiz from a Conversation's materials
#[utoipa::path(
    post,
    path = "/api/practice-quizz",
    request_body = GenerateParams,
    responses(
        (status = 201, description = "Successfully generated a Practice Quiz", body = PracticeQuizView),
        (status = 400, description = "Invalid request body, or no learning materials"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Conversation not found"),
        (status = 409, description = "Materials are still being processed"),
        (status = 502, description = "Quiz service returned an error or no questions"),
        (status = 503, description = "Quiz or RAG service is unavailable"),
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
    debug!("POST Generate a Practice Quiz from: {params:?}");

    let quiz = PracticeQuizApi::generate(
        app_state.db_conn_ref(),
        &app_state.config,
        app_state.health_cache_ref(),
        user.id,
        params.into(),
    )
    .await?;

    info!("Generated practice quiz {} for user {}", quiz.id, user.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(PracticeQuizView::from(quiz))),
    ))
}

/// GET the caller's Practice Quizzes, newest first
#[utoipa::path(
    get,
    path = "/api/practice-quizz",
    params(IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved Practice Quizzes", body = [PracticeQuizView]),
        (status = 400, description = "Invalid conversationId"),
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
    debug!("GET Practice Quizzes with params: {params:?}");

    let quizzes =
        PracticeQuizApi::find_by_user(app_state.db_conn_ref(), user.id, params.into()).await?;
    let quizzes: Vec<PracticeQuizView> = quizzes.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::new(quizzes)))
}

/// GET a particular Practice Quiz specified by its id.
#[utoipa::path(
    get,
    path = "/api/practice-quizz/{id}",
    params(
        ("id" = Uuid, Path, description = "Practice Quiz id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Practice Quiz", body = PracticeQuizView),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Practice quiz not found"),
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
    debug!("GET Practice Quiz by id: {id}");

    let quiz = PracticeQuizApi::find_by_id_and_user(app_state.db_conn_ref(), id, user.id).await?;

    Ok(Json(ApiResponse::new(PracticeQuizView::from(quiz))))
}

/// POST grade a set of answers to a Practice Quiz
#[utoipa::path(
    post,
    path = "/api/practice-quizz/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Id of the Practice Quiz being answered"),
    ),
    request_body = SubmitParams,
    responses(
        (status = 200, description = "The graded submission and the updated quiz", body = SubmitResponse),
        (status = 400, description = "answers are required"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Practice quiz not found"),
        (status = 502, description = "Quiz service returned an error"),
        (status = 503, description = "Quiz service is unavailable"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn submit(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    ValidJson(params): ValidJson<SubmitParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Submit {} answers to Practice Quiz {id}", params.answers.len());

    let (quiz, submission) = PracticeQuizApi::submit(
        app_state.db_conn_ref(),
        &app_state.config,
        app_state.health_cache_ref(),
        id,
        user.id,
        params.into(),
    )
    .await?;

    info!(
        "Practice quiz {id} scored {}/{}",
        submission.summary.correct, submission.summary.total
    );

    Ok(Json(ApiResponse::new(SubmitResponse::new(quiz, submission))))
}
