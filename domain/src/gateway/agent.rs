//! Client for the conversational agent service. Chat replies arrive as an SSE byte stream.

use crate::error::Error;
use entity::Id;
use futures::stream::{BoxStream, StreamExt};
use log::*;
use serde::Serialize;
use service::config::Config;
use service::health_cache::UpstreamService;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct AgentChatRequest {
    pub conversation_id: Id,
    pub user_id: Id,
    pub message: String,
    pub history: Vec<HistoryEntry>,
    pub material_ids: Vec<Id>,
}

pub type ByteStream = BoxStream<'static, Result<Vec<u8>, Error>>;

pub struct AgentClient {
    client: reqwest::Client,
    base_url: String,
}

impl AgentClient {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            client: super::build_client(None)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(config.upstream_url(UpstreamService::Agent))
    }

    /// Opens a streaming chat request and hands back the raw response body.
    pub async fn chat(&self, request: &AgentChatRequest) -> Result<ByteStream, Error> {
        debug!(
            "Opening agent stream for conversation {} with {} history entries",
            request.conversation_id,
            request.history.len()
        );

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = super::error_body(response, "").await;
            warn!("Agent service rejected chat request ({status}): {body}");
            return Err(Error::bad_gateway("Agent service failed to respond"));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(Error::from))
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, ExternalErrorKind};
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn chat_streams_response_body() {
        let mut server = Server::new_async().await;
        let conversation_id = Id::new_v4();
        let user_id = Id::new_v4();
        let _mock = server
            .mock("POST", "/chat")
            .match_body(Matcher::Json(json!({
                "conversation_id": conversation_id,
                "user_id": user_id,
                "message": "hello",
                "history": [{"role": "user", "content": "earlier"}],
                "material_ids": []
            })))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body("event: token\ndata: {\"delta\":\"Hi\"}\n\n")
            .create_async()
            .await;

        let client = AgentClient::new(&server.url()).unwrap();
        let mut stream = client
            .chat(&AgentChatRequest {
                conversation_id,
                user_id,
                message: "hello".to_string(),
                history: vec![HistoryEntry {
                    role: "user".to_string(),
                    content: "earlier".to_string(),
                }],
                material_ids: vec![],
            })
            .await
            .unwrap();

        let mut body = Vec::new();
        while let Some(chunk) = stream.next().await {
            body.extend(chunk.unwrap());
        }
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "event: token\ndata: {\"delta\":\"Hi\"}\n\n"
        );
    }

    #[tokio::test]
    async fn chat_rejection_is_a_bad_gateway() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat")
            .with_status(500)
            .create_async()
            .await;

        let client = AgentClient::new(&server.url()).unwrap();
        let result = client
            .chat(&AgentChatRequest {
                conversation_id: Id::new_v4(),
                user_id: Id::new_v4(),
                message: "hello".to_string(),
                history: vec![],
                material_ids: vec![],
            })
            .await;

        match result {
            Err(err) => assert_eq!(
                err.error_kind,
                DomainErrorKind::External(ExternalErrorKind::BadGateway(
                    "Agent service failed to respond".to_string()
                ))
            ),
            Ok(_) => panic!("expected the agent rejection to surface"),
        }
    }
}
