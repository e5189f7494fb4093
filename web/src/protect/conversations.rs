use crate::{extractors::authenticated_user::AuthenticatedUser, AppState, Error};
use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::IntoResponse,
};

use domain::{conversation, Id};
use log::*;

/// Checks that the conversation referenced by the single path parameter exists and
/// belongs to the authenticated user. Used for `/conversations/:id` and
/// `/messages/:conversationId`.
///  Intended to be given to axum::middleware::from_fn_with_state in the router
pub(crate) async fn owner(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(conversation_id): Path<Id>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    match conversation::find_by_id_and_user(app_state.db_conn_ref(), conversation_id, user.id)
        .await
    {
        Ok(_) => next.run(request).await,
        Err(e) => {
            debug!("User {} denied access to conversation {conversation_id}", user.id);
            Error::from(e).into_response()
        }
    }
}
