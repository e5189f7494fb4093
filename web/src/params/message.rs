use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateParams {
    #[serde(alias = "conversation_id")]
    pub(crate) conversation_id: Option<String>,
    /// `user` or `assistant`
    pub(crate) role: Option<String>,
    pub(crate) content: Option<String>,
}
