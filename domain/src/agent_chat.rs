//! Relays a chat turn to the agent service as a stream of events.
//!
//! The user's message is stored first, then the agent's server-sent events are read as they
//! arrive. `token` frames are forwarded as they come, a `metadata` frame is remembered, and once
//! the agent finishes the full reply is stored as the assistant message.

use crate::error::Error;
use crate::gateway::agent::{AgentChatRequest, AgentClient, HistoryEntry};
use crate::gateway::health::ensure_service_healthy;
use crate::message_role::MessageRole;
use crate::{conversation, learning_material, messages, Id};
use async_stream::{stream, try_stream};
use entity_api::message;
use futures::{Stream, StreamExt};
use log::*;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use service::config::Config;
use service::health_cache::{HealthCache, UpstreamService};
use std::sync::Arc;

/// How many earlier messages are sent along as context.
pub const HISTORY_LIMIT: u64 = 15;

const FRAME_BOUNDARY: &[u8] = b"\n\n";

/// One parsed server-sent event.
#[derive(Debug, Clone, PartialEq)]
pub struct SseFrame {
    pub event: String,
    pub data: Value,
}

/// Parses the text of one frame. The event name defaults to `message`; `data:` lines are
/// joined with newlines and read as JSON, or wrapped as `{"raw": ...}` when they aren't JSON.
pub fn parse_sse_frame(raw: &str) -> Option<SseFrame> {
    if raw.trim().is_empty() {
        return None;
    }

    let mut event = "message".to_string();
    let mut data_lines = Vec::new();
    for line in raw.lines() {
        if let Some(name) = line.strip_prefix("event:") {
            event = name.trim().to_string();
        } else if let Some(data) = line.strip_prefix("data:") {
            data_lines.push(data.trim());
        }
    }

    let data = data_lines.join("\n");
    let data = serde_json::from_str(&data).unwrap_or_else(|_| json!({ "raw": data }));

    Some(SseFrame { event, data })
}

/// Reassembles frames from arbitrarily split chunks. Bytes are kept until a frame boundary
/// arrives, so UTF-8 sequences cut by a chunk boundary are decoded whole.
#[derive(Debug, Default)]
pub struct SseFrameBuffer {
    pending: Vec<u8>,
}

impl SseFrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a chunk and returns every frame it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.pending.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(end) = self
            .pending
            .windows(FRAME_BOUNDARY.len())
            .position(|window| window == FRAME_BOUNDARY)
        {
            let rest = self.pending.split_off(end + FRAME_BOUNDARY.len());
            let frame = std::mem::replace(&mut self.pending, rest);
            if let Some(frame) = parse_sse_frame(&String::from_utf8_lossy(&frame[..end])) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Whatever is left once the upstream closed, if it isn't blank.
    pub fn finish(self) -> Option<SseFrame> {
        parse_sse_frame(&String::from_utf8_lossy(&self.pending))
    }
}

/// The agent's own final message wins over the streamed tokens when it's non-empty.
pub fn final_content(metadata: Option<&Value>, accumulated: &str) -> String {
    metadata
        .and_then(|metadata| metadata.get("message"))
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .unwrap_or(accumulated)
        .to_string()
}

/// Events sent to the client, in the order they occur.
#[derive(Debug)]
pub enum ChatEvent {
    User(messages::Model),
    Token {
        delta: String,
    },
    Assistant(messages::Model),
    Metadata {
        message_id: Id,
        metadata: Value,
        tool_calls: Value,
    },
    Done,
    /// Ends the stream
    Failed(Error),
}

impl ChatEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ChatEvent::User(_) => "user",
            ChatEvent::Token { .. } => "token",
            ChatEvent::Assistant(_) => "assistant",
            ChatEvent::Metadata { .. } => "metadata",
            ChatEvent::Done => "done",
            ChatEvent::Failed(_) => "error",
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            ChatEvent::User(message) | ChatEvent::Assistant(message) => {
                json!({ "message": message })
            }
            ChatEvent::Token { delta } => json!({ "delta": delta }),
            ChatEvent::Metadata {
                message_id,
                metadata,
                tool_calls,
            } => json!({
                "messageId": message_id,
                "metadata": metadata,
                "toolCalls": tool_calls,
            }),
            ChatEvent::Done => json!({ "success": true }),
            ChatEvent::Failed(e) => json!({ "message": e.message() }),
        }
    }
}

/// What the relay needs from application state. Owned so the stream can outlive the request.
#[derive(Clone)]
pub struct ChatContext {
    pub db: Arc<DatabaseConnection>,
    pub config: Config,
    pub health: Arc<HealthCache>,
}

/// Checks a chat request before any streaming starts.
pub fn validate_request(
    conversation_id: Option<&str>,
    message: Option<&str>,
) -> Result<(Id, String), Error> {
    let conversation_id = match conversation_id.map(str::trim) {
        None | Some("") => return Err(Error::input("conversationId is required")),
        Some(value) => {
            Id::parse_str(value).map_err(|_| Error::input("Invalid conversationId"))?
        }
    };

    let message = message
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .ok_or_else(|| Error::input("message is required"))?;

    Ok((conversation_id, message.to_string()))
}

/// Runs one chat turn. Any failure becomes a final `ChatEvent::Failed`.
pub fn stream_chat(
    context: ChatContext,
    user_id: Id,
    conversation_id: Id,
    message: String,
) -> impl Stream<Item = ChatEvent> + Send + 'static {
    stream! {
        let events = relay(context, user_id, conversation_id, message);
        futures::pin_mut!(events);

        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    yield event;
                }
                Err(e) => {
                    warn!("Agent chat for conversation {conversation_id} failed: {e}");
                    yield ChatEvent::Failed(e);
                    break;
                }
            }
        }
    }
}

fn relay(
    context: ChatContext,
    user_id: Id,
    conversation_id: Id,
    content: String,
) -> impl Stream<Item = Result<ChatEvent, Error>> + Send + 'static {
    try_stream! {
        let db = context.db.as_ref();

        conversation::find_by_id_and_user(db, conversation_id, user_id).await?;

        let history: Vec<HistoryEntry> = message::find_recent(db, conversation_id, HISTORY_LIMIT)
            .await?
            .into_iter()
            .map(|message| HistoryEntry {
                role: message.role.to_string(),
                content: message.content,
            })
            .collect();

        let user_message =
            message::create(db, conversation_id, MessageRole::User, content.clone()).await?;
        yield ChatEvent::User(user_message);

        let material_ids =
            learning_material::find_processed_ids(db, conversation_id, user_id).await?;

        ensure_service_healthy(&context.config, &context.health, UpstreamService::Agent).await?;

        let mut upstream = AgentClient::from_config(&context.config)?
            .chat(&AgentChatRequest {
                conversation_id,
                user_id,
                message: content,
                history,
                material_ids,
            })
            .await?;

        let mut buffer = SseFrameBuffer::new();
        let mut accumulated = String::new();
        let mut metadata: Option<Value> = None;

        while let Some(chunk) = upstream.next().await {
            let chunk = chunk?;
            for frame in buffer.push(&chunk) {
                match frame.event.as_str() {
                    "token" => {
                        let delta = frame
                            .data
                            .get("delta")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string();
                        accumulated.push_str(&delta);
                        yield ChatEvent::Token { delta };
                    }
                    "metadata" => metadata = Some(frame.data),
                    other => trace!("Ignoring agent event {other}"),
                }
            }
        }

        if let Some(frame) = buffer.finish() {
            if frame.event == "metadata" {
                metadata = Some(frame.data);
            }
        }

        let reply = final_content(metadata.as_ref(), &accumulated);
        let assistant_message =
            message::create(db, conversation_id, MessageRole::Assistant, reply).await?;
        conversation::touch(db, conversation_id).await?;

        let message_id = assistant_message.id;
        yield ChatEvent::Assistant(assistant_message);

        if let Some(metadata) = metadata {
            yield ChatEvent::Metadata {
                message_id,
                metadata: metadata
                    .get("metadata")
                    .filter(|value| !value.is_null())
                    .cloned()
                    .unwrap_or_else(|| json!({})),
                tool_calls: metadata
                    .get("tool_calls")
                    .filter(|value| !value.is_null())
                    .cloned()
                    .unwrap_or_else(|| json!([])),
            };
        }

        yield ChatEvent::Done;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_frame_defaults_event_name_and_joins_data_lines() {
        let frame = parse_sse_frame("data: {\"a\":\ndata: 1}").unwrap();

        assert_eq!(frame.event, "message");
        assert_eq!(frame.data, json!({"a": 1}));
    }

    #[test]
    fn parse_frame_wraps_non_json_data() {
        let frame = parse_sse_frame("event: token\ndata: hello").unwrap();

        assert_eq!(frame.event, "token");
        assert_eq!(frame.data, json!({"raw": "hello"}));
        assert!(parse_sse_frame("  \n ").is_none());
    }

    #[test]
    fn buffer_splits_on_blank_lines() {
        let mut buffer = SseFrameBuffer::new();

        let frames = buffer.push(
            b"event: token\ndata: {\"delta\":\"Hel\"}\n\nevent: token\ndata: {\"delta\":\"lo\"}\n\nevent: meta",
        );

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].data, json!({"delta": "lo"}));

        let frames = buffer.push(b"data\ndata: {\"message\":\"Hello\"}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "metadata");
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn buffer_reassembles_split_utf8() {
        let frame = "event: token\ndata: {\"delta\":\"café ☕\"}\n\n".as_bytes();
        // Split inside the three byte encoding of the cup
        let cut = frame.len() - 6;

        let mut buffer = SseFrameBuffer::new();
        assert!(buffer.push(&frame[..cut]).is_empty());
        let frames = buffer.push(&frame[cut..]);

        assert_eq!(frames[0].data, json!({"delta": "café ☕"}));
    }

    #[test]
    fn buffer_boundary_split_across_chunks() {
        let mut buffer = SseFrameBuffer::new();

        assert!(buffer.push(b"event: token\ndata: {\"delta\":\"a\"}\n").is_empty());
        assert_eq!(buffer.push(b"\n").len(), 1);
    }

    #[test]
    fn leftover_without_boundary_is_returned_by_finish() {
        let mut buffer = SseFrameBuffer::new();
        buffer.push(b"event: metadata\ndata: {\"message\":\"Done\"}");

        let frame = buffer.finish().unwrap();
        assert_eq!(frame.event, "metadata");
    }

    #[test]
    fn final_content_prefers_non_empty_metadata_message() {
        assert_eq!(
            final_content(Some(&json!({"message": "Full answer"})), "partial"),
            "Full answer"
        );
        assert_eq!(final_content(Some(&json!({"message": ""})), "partial"), "partial");
        assert_eq!(final_content(Some(&json!({"tool_calls": []})), "partial"), "partial");
        assert_eq!(final_content(None, "streamed"), "streamed");
    }

    #[test]
    fn validate_request_checks_conversation_then_message() {
        assert_eq!(
            validate_request(None, Some("hi")).unwrap_err().message(),
            "conversationId is required"
        );
        let id = Id::new_v4().to_string();
        assert_eq!(
            validate_request(Some(&id), Some("   ")).unwrap_err().message(),
            "message is required"
        );
        let (_, message) = validate_request(Some(&id), Some(" hi ")).unwrap();
        assert_eq!(message, "hi");
    }

    #[test]
    fn metadata_payload_uses_camel_case_keys() {
        let message_id = Id::new_v4();
        let event = ChatEvent::Metadata {
            message_id,
            metadata: json!({}),
            tool_calls: json!([]),
        };

        assert_eq!(event.name(), "metadata");
        assert_eq!(
            event.payload(),
            json!({"messageId": message_id, "metadata": {}, "toolCalls": []})
        );
    }
}
