use crate::error::status_and_message;
use crate::extractors::{authenticated_user::AuthenticatedUser, valid_json::ValidJson};
use crate::params::agent::ChatParams;
use crate::{AppState, Error};
use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use domain::agent_chat::{self as AgentChatApi, ChatContext, ChatEvent};
use futures::{Stream, StreamExt};
use log::*;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;

/// The SSE event for one step of a chat turn. Errors also carry the HTTP status
/// the failure would have had, since the response status is already sent.
fn to_sse_event(event: &ChatEvent) -> Event {
    let payload: Value = match event {
        ChatEvent::Failed(e) => {
            let (status, message) = status_and_message(e);
            json!({ "status": status.as_u16(), "message": message })
        }
        event => event.payload(),
    };

    Event::default()
        .event(event.name())
        .json_data(&payload)
        .unwrap_or_else(|e| {
            error!("Failed to serialize {} event: {e}", event.name());
            Event::default()
                .event("error")
                .data(r#"{"status":500,"message":"Internal server error"}"#)
        })
}

/// POST send a message to the agent and stream its reply
#[utoipa::path(
    post,
    path = "/api/agent/chat",
    request_body = ChatParams,
    responses(
        (status = 200, description = "An event stream of `user`, `token`, `assistant`, `metadata`, `done` or `error` events", content_type = "text/event-stream"),
        (status = 400, description = "conversationId or message is missing"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn chat(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    ValidJson(params): ValidJson<ChatParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, Error> {
    let (conversation_id, message) = AgentChatApi::validate_request(
        params.conversation_id.as_deref(),
        params.message.as_deref(),
    )?;

    debug!(
        "Starting agent chat for user {} in conversation {conversation_id}",
        user.id
    );

    let context = ChatContext {
        db: Arc::clone(&app_state.database_connection),
        config: app_state.config.clone(),
        health: Arc::clone(&app_state.service_health),
    };
    let user_id = user.id;

    // Dropping the response (client disconnect) drops this stream and the upstream read with it
    let stream = stream! {
        let events = AgentChatApi::stream_chat(context, user_id, conversation_id, message);
        futures::pin_mut!(events);

        while let Some(event) = events.next().await {
            yield Ok(to_sse_event(&event));
        }

        debug!("Agent chat stream closed for conversation {conversation_id}");
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::error::Error as DomainError;

    #[test]
    fn failure_events_carry_status_and_message() {
        let event = ChatEvent::Failed(DomainError::bad_gateway("Agent service failed to respond"));

        // Event has no public accessors; its Debug output holds the encoded frame
        let rendered = format!("{:?}", to_sse_event(&event));
        assert!(rendered.contains("error"));
        assert!(rendered.contains("502"));
        assert!(rendered.contains("Agent service failed to respond"));
    }
}
