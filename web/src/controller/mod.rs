use serde::Serialize;
pub(crate) mod agent_controller;
pub(crate) mod auth_controller;
pub(crate) mod conversation_controller;
pub(crate) mod graphql_controller;
pub(crate) mod health_check_controller;
pub(crate) mod material_controller;
pub(crate) mod message_controller;
pub(crate) mod practice_quiz_controller;
pub(crate) mod question_controller;
pub(crate) mod rag_controller;
pub(crate) mod upload_controller;

/// Envelope for every successful REST data response.
#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn message(message: &str) -> ApiResponse<()> {
        ApiResponse {
            success: true,
            data: None,
            message: Some(message.to_string()),
        }
    }
}
