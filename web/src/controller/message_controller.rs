use crate::controller::ApiResponse;
use crate::extractors::{authenticated_user::AuthenticatedUser, valid_json::ValidJson};
use crate::params::message::CreateParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::error::Error as DomainError;
use domain::message as MessageApi;
use domain::Id;

use log::*;

/// GET a Conversation's Messages in the order they were sent
#[utoipa::path(
    get,
    path = "/api/messages/{conversationId}",
    params(
        ("conversationId" = Uuid, Path, description = "Conversation whose Messages to retrieve"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved Messages", body = [domain::messages::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Conversation not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(conversation_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Messages for Conversation {conversation_id}");

    let messages =
        MessageApi::find_by_conversation(app_state.db_conn_ref(), conversation_id, user.id)
            .await?;

    Ok(Json(ApiResponse::new(messages)))
}

/// POST add a Message to a Conversation
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully Created a New Message", body = domain::messages::Model),
        (status = 400, description = "Invalid role or empty content"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Conversation not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    ValidJson(params): ValidJson<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Message from: {params:?}");

    let conversation_id = match params.conversation_id.as_deref().map(str::trim) {
        None | Some("") => return Err(DomainError::input("conversationId is required").into()),
        Some(id) => Id::parse_str(id).map_err(|_| DomainError::input("Invalid conversationId"))?,
    };

    let message = MessageApi::create(
        app_state.db_conn_ref(),
        conversation_id,
        user.id,
        params.role.as_deref().unwrap_or_default(),
        params.content.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(message))))
}
