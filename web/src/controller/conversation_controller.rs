use crate::controller::ApiResponse;
use crate::extractors::{authenticated_user::AuthenticatedUser, valid_json::ValidJson};
use crate::params::conversation::{CreateParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::conversation as ConversationApi;
use domain::Id;

use log::*;

/// GET all of the caller's conversations, most recently active first
#[utoipa::path(
    get,
    path = "/api/conversations",
    responses(
        (status = 200, description = "Successfully retrieved all Conversations", body = [domain::conversations::Model]),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Conversations for user {}", user.id);

    let conversations = ConversationApi::find_by_user(app_state.db_conn_ref(), user.id).await?;

    Ok(Json(ApiResponse::new(conversations)))
}

/// POST create a new Conversation
#[utoipa::path(
    post,
    path = "/api/conversations",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully Created a New Conversation", body = domain::conversations::Model),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    params: Option<ValidJson<CreateParams>>,
) -> Result<impl IntoResponse, Error> {
    let params = params.map(|ValidJson(params)| params).unwrap_or_default();
    debug!("POST Create a New Conversation from: {params:?}");

    let conversation =
        ConversationApi::create(app_state.db_conn_ref(), user.id, params.title.as_deref()).await?;

    debug!("New Conversation: {conversation:?}");

    Ok((StatusCode::CREATED, Json(ApiResponse::new(conversation))))
}

/// PUT rename a Conversation
#[utoipa::path(
    put,
    path = "/api/conversations/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the Conversation to update"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Conversation", body = domain::conversations::Model),
        (status = 400, description = "Title is required"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Conversation not found"),
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
    debug!("PUT Update Conversation {id} with: {params:?}");

    let conversation = ConversationApi::update_title(
        app_state.db_conn_ref(),
        id,
        user.id,
        params.title.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse::new(conversation)))
}

/// DELETE a Conversation along with its messages and practice quizzes
#[utoipa::path(
    delete,
    path = "/api/conversations/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the Conversation to delete"),
    ),
    responses(
        (status = 200, description = "Successfully Deleted Conversation"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Conversation not found"),
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
    debug!("DELETE Conversation {id}");

    ConversationApi::delete(app_state.db_conn_ref(), id, user.id).await?;

    Ok(Json(ApiResponse::<()>::message(
        "Conversation deleted successfully",
    )))
}
