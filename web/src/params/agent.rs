use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatParams {
    #[serde(alias = "conversation_id")]
    pub(crate) conversation_id: Option<String>,
    pub(crate) message: Option<String>,
}
